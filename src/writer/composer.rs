//! Per-document composition context.
//!
//! [`Composer`] owns the object table, the page content streams, the group
//! stack and the graphics-state registry of one document. Every operator a
//! drawing primitive writes goes through its [`OperatorSink`] implementation
//! and lands in the innermost open group, or in the current page when no
//! group is open.
//!
//! # Example
//!
//! ```
//! use pdf_compose::writer::{
//!     CompositeOperation, Composer, GroupOptions, OperatorSink, PageDimensions, ResourceScope,
//! };
//!
//! let mut composer = Composer::with_page(PageDimensions::new(612.0, 792.0));
//! let mask = composer.open_group(GroupOptions::named("M").with_mask(true))?;
//! composer.write("0 0 100 100 re f");
//! composer.close_group()?;
//!
//! composer.write("1 0 0 rg 0 0 612 792 re f");
//! composer.draw_group(&mask, CompositeOperation::DestinationIn)?;
//! composer.register_opacity(0.5, ResourceScope::Page(0))?;
//!
//! let doc = composer.finish()?;
//! assert_eq!(doc.pages()[0].content[0], "/MASK2 gs");
//! # Ok::<(), pdf_compose::Error>(())
//! ```

use super::content_sink::{Destination, OperatorSink, Redirection};
use super::graphics_state::{
    blend_mode_name, opacity_name, soft_mask_name, BlendMode, GraphicsStateRegistry,
};
use super::group_stack::{CanvasState, CompositeOperation, Group, GroupOptions, GroupRef, GroupStack};
use super::object_serializer::{to_dictionary_syntax, validate_key};
use super::object_table::{ObjectKind, ObjectTable};
use super::pattern::{pattern_name, AxialShadingPattern};
use super::resources::{ResourceDictionary, ResourceKind, ResourceScope};
use crate::config::ComposerConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Page size as reported by the surrounding document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    /// Width in document units
    pub width: f64,
    /// Height in document units
    pub height: f64,
    /// Points per document unit
    pub scale_factor: f64,
}

impl PageDimensions {
    /// Dimensions already in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
        }
    }

    /// Set the points-per-unit scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Full-page box in points, rounded to two decimals.
    ///
    /// Non-finite sizes carry through; opening a group over them fails when
    /// its header is validated.
    pub fn bbox(&self) -> [f64; 4] {
        [
            0.0,
            0.0,
            round2(self.width * self.scale_factor),
            round2(self.height * self.scale_factor),
        ]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Content stream and resources of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    /// Page size
    pub dimensions: PageDimensions,
    /// Content-stream operators
    pub content: Vec<String>,
    /// Page resources
    pub resources: ResourceDictionary,
}

impl PageContent {
    fn new(dimensions: PageDimensions) -> Self {
        Self {
            dimensions,
            content: Vec::new(),
            resources: ResourceDictionary::new(),
        }
    }
}

/// Composition context of one document.
#[derive(Debug)]
pub struct Composer {
    config: ComposerConfig,
    objects: ObjectTable,
    pages: Vec<PageContent>,
    current_page: usize,
    redirection: Redirection,
    stack: GroupStack,
    groups: Vec<Group>,
    group_resources: HashMap<u32, ResourceDictionary>,
    registry: GraphicsStateRegistry,
}

impl Composer {
    /// Create a composer whose first page has the given size.
    pub fn new(config: ComposerConfig, first_page: PageDimensions) -> Result<Self> {
        let init_blend_modes = config.init_blend_modes;
        let mut composer = Self::build(config, first_page);
        if init_blend_modes {
            composer.init_blend_modes(ResourceScope::Page(0))?;
        }
        Ok(composer)
    }

    /// Create a composer with the default configuration.
    pub fn with_page(first_page: PageDimensions) -> Self {
        Self::build(ComposerConfig::default(), first_page)
    }

    fn build(config: ComposerConfig, first_page: PageDimensions) -> Self {
        Self {
            objects: ObjectTable::starting_at(config.first_object_id),
            pages: vec![PageContent::new(first_page)],
            current_page: 0,
            redirection: Redirection::new(0),
            stack: GroupStack::new(),
            groups: Vec::new(),
            group_resources: HashMap::new(),
            registry: GraphicsStateRegistry::new(),
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Object table.
    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    /// Graphics-state registry.
    pub fn registry(&self) -> &GraphicsStateRegistry {
        &self.registry
    }

    // Pages

    /// Append a page and return its index.
    pub fn add_page(&mut self, dimensions: PageDimensions) -> usize {
        self.pages.push(PageContent::new(dimensions));
        self.pages.len() - 1
    }

    /// Make `index` the page that receives operators when no group is open.
    pub fn set_current_page(&mut self, index: usize) -> Result<()> {
        self.check_page(index)?;
        self.current_page = index;
        if self.stack.is_empty() {
            self.redirection.redirect_to_page(index);
        }
        Ok(())
    }

    /// Index of the current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Content stream of a page.
    pub fn page_content(&self, index: usize) -> Option<&[String]> {
        self.pages.get(index).map(|p| p.content.as_slice())
    }

    fn check_page(&self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(Error::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        Ok(())
    }

    // Resources

    /// Scope matching the current destination.
    pub fn active_scope(&self) -> ResourceScope {
        self.redirection.target().into()
    }

    /// Resource dictionary of a scope.
    pub fn resources(&self, scope: ResourceScope) -> Option<&ResourceDictionary> {
        match scope {
            ResourceScope::Page(index) => self.pages.get(index).map(|p| &p.resources),
            ResourceScope::Group(id) => self.group_resources.get(&id),
        }
    }

    fn resources_mut(&mut self, scope: ResourceScope) -> Result<&mut ResourceDictionary> {
        match scope {
            ResourceScope::Page(index) => {
                let count = self.pages.len();
                self.pages
                    .get_mut(index)
                    .map(|p| &mut p.resources)
                    .ok_or(Error::PageOutOfRange { index, count })
            },
            ResourceScope::Group(id) => self
                .group_resources
                .get_mut(&id)
                .ok_or_else(|| Error::GroupNotFound(format!("{} 0 R", id))),
        }
    }

    /// Make object `id` available as `/kind /name` to content in `scope`.
    pub fn register_resource(
        &mut self,
        scope: ResourceScope,
        kind: ResourceKind,
        name: &str,
        id: u32,
    ) -> Result<()> {
        self.resources_mut(scope)?.register(kind, name, id);
        log::debug!("Registered /{} /{} -> {} 0 R in {:?}", kind.as_pdf_name(), name, id, scope);
        Ok(())
    }

    // Groups

    /// Open a group with the configured default options.
    pub fn open_default_group(&mut self) -> Result<Group> {
        let options = self.config.default_group.clone();
        self.open_group(options)
    }

    /// Open a transparency group and redirect all following operators to it.
    ///
    /// Bounds default to the first page's box regardless of which page the
    /// group is eventually painted on; pass `GroupOptions::bbox` to override.
    pub fn open_group(&mut self, options: GroupOptions) -> Result<Group> {
        let name = match options.name.clone() {
            Some(name) => name,
            None => self.unused_group_name(),
        };
        validate_key(&name)?;
        if self.groups.iter().any(|g| g.name == name) {
            return Err(Error::DuplicateGroupName(name));
        }

        let bbox = options.bbox.unwrap_or_else(|| self.pages[0].dimensions.bbox());
        let id = self
            .objects
            .allocate(ObjectKind::Group, options.form_header(bbox))?;
        let group = Group {
            id,
            name,
            isolated: options.isolated,
            knockout: options.knockout,
            is_mask: options.is_mask,
            bbox,
        };

        self.stack.push(group.clone());
        self.groups.push(group.clone());
        self.group_resources.insert(id, ResourceDictionary::new());
        self.redirection.redirect_to(Destination::Group(id));
        log::debug!(
            "Opened group /{} ({} 0 R) at depth {}",
            group.name,
            id,
            self.stack.depth()
        );
        Ok(group)
    }

    /// `GROUP<next id>`, suffixed with `_<n>` if a caller already took it.
    fn unused_group_name(&self) -> String {
        let base = format!("GROUP{}", self.objects.next_id());
        let mut name = base.clone();
        let mut suffix = 1;
        while self.group(&name).is_some() {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        name
    }

    /// Close the innermost group and return it.
    ///
    /// Operators go back to the enclosing group, or to the current page when
    /// the stack becomes empty.
    pub fn close_group(&mut self) -> Result<Group> {
        let group = self.stack.pop()?;
        match self.stack.top() {
            Some(top) => self.redirection.redirect_to(Destination::Group(top.id)),
            None => self.redirection.redirect_to_page(self.current_page),
        }
        log::debug!(
            "Closed group /{} ({} 0 R) at depth {}",
            group.name,
            group.id,
            self.stack.depth()
        );
        Ok(group)
    }

    /// Number of open groups.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Every group created so far, in creation order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Content stream of a group.
    pub fn group_content(&self, group: &Group) -> Option<&[String]> {
        self.objects
            .get(group.id)
            .filter(|obj| obj.kind() == ObjectKind::Group)
            .map(|obj| obj.body())
    }

    fn resolve_group(&self, group: GroupRef<'_>) -> Result<Group> {
        let found = match group {
            GroupRef::Handle(handle) => self.groups.iter().find(|g| g.id == handle.id),
            GroupRef::Name(name) => self.group(name),
        };
        match (found, group) {
            (Some(g), _) => Ok(g.clone()),
            (None, GroupRef::Handle(handle)) => Err(Error::GroupNotFound(handle.name.clone())),
            (None, GroupRef::Name(name)) => Err(Error::GroupNotFound(name.to_string())),
        }
    }

    /// Paint a closed group onto the current destination.
    ///
    /// - `normal` / `source-over`: append `/<name> Do` and register the form
    ///   as an XObject of the active scope.
    /// - `destination-in`: use the group as an alpha soft mask; a fresh
    ///   `MASK<id>` state is registered in the active scope and its `gs`
    ///   operator is inserted before everything already written, so the mask
    ///   applies to that content too.
    ///
    /// Any other operation fails with [`Error::UnsupportedCompositeMode`].
    pub fn draw_group<'a>(
        &mut self,
        group: impl Into<GroupRef<'a>>,
        operation: CompositeOperation,
    ) -> Result<()> {
        let group = self.resolve_group(group.into())?;
        if self.stack.contains(group.id) {
            return Err(Error::GroupStillOpen(group.name));
        }
        let scope = self.active_scope();

        match operation {
            CompositeOperation::Normal | CompositeOperation::SourceOver => {
                self.register_resource(scope, ResourceKind::XObject, &group.name, group.id)?;
                self.write(&format!("/{} Do", group.name));
            },
            CompositeOperation::DestinationIn => {
                let state = self.registry.soft_mask_state(&mut self.objects, group.id)?;
                let name = soft_mask_name(state);
                self.register_resource(scope, ResourceKind::ExtGState, &name, state)?;
                self.prepend(&format!("/{} gs", name));
            },
            other => return Err(Error::UnsupportedCompositeMode(other.as_str().to_string())),
        }
        log::debug!("Drew group /{} with {} into {:?}", group.name, operation.as_str(), scope);
        Ok(())
    }

    /// Paint a closed group using the drawing layer's current composite
    /// operation.
    pub fn draw_group_with<'a>(
        &mut self,
        group: impl Into<GroupRef<'a>>,
        canvas: &impl CanvasState,
    ) -> Result<()> {
        let operation: CompositeOperation = canvas.composite_operation().parse()?;
        self.draw_group(group, operation)
    }

    // Graphics states

    /// Apply `value` as stroke and fill opacity to subsequent drawing.
    ///
    /// The state object is shared by every call with the same value; the
    /// `gs` operator is written on every call.
    pub fn register_opacity(&mut self, value: f64, scope: ResourceScope) -> Result<String> {
        self.resources_mut(scope)?;
        let id = self.registry.opacity_state(&mut self.objects, value)?;
        let name = opacity_name(id);
        self.register_resource(scope, ResourceKind::ExtGState, &name, id)?;
        self.write(&format!("/{} gs", name));
        Ok(name)
    }

    /// Create the 16 blend mode states and register them in `scope`.
    ///
    /// Calling this twice creates a second set of objects.
    pub fn init_blend_modes(&mut self, scope: ResourceScope) -> Result<Vec<String>> {
        self.resources_mut(scope)?;
        let created = self.registry.init_blend_modes(&mut self.objects)?;
        let mut names = Vec::with_capacity(created.len());
        for (_, id) in created {
            let name = blend_mode_name(id);
            self.register_resource(scope, ResourceKind::ExtGState, &name, id)?;
            names.push(name);
        }
        Ok(names)
    }

    /// Resource name of the state for `mode`.
    pub fn blend_mode_resource(&self, mode: BlendMode) -> Option<String> {
        self.registry.blend_mode_resource(mode)
    }

    /// Apply a blend mode to subsequent drawing.
    ///
    /// Blend mode states are created on first use if `init_blend_modes` has
    /// not run yet.
    pub fn apply_blend_mode(&mut self, mode: BlendMode, scope: ResourceScope) -> Result<String> {
        self.resources_mut(scope)?;
        let id = match self.registry.blend_mode_state(mode) {
            Some(id) => id,
            None => {
                self.init_blend_modes(scope)?;
                self.registry
                    .blend_mode_state(mode)
                    .ok_or_else(|| Error::UnknownBlendMode(mode.as_pdf_name().to_string()))?
            },
        };
        let name = blend_mode_name(id);
        self.register_resource(scope, ResourceKind::ExtGState, &name, id)?;
        self.write(&format!("/{} gs", name));
        Ok(name)
    }

    // Patterns

    /// Allocate a shading pattern and register it as `P<id>` in `scope`.
    pub fn add_axial_shading_pattern(
        &mut self,
        pattern: &AxialShadingPattern,
        scope: ResourceScope,
    ) -> Result<String> {
        self.resources_mut(scope)?;
        let dict = pattern.build();
        log::debug!("Shading pattern: {}", to_dictionary_syntax(&dict)?);
        let id = self.objects.allocate(ObjectKind::Dictionary, dict)?;
        let name = pattern_name(id);
        self.register_resource(scope, ResourceKind::Pattern, &name, id)?;
        Ok(name)
    }

    // Finalisation

    /// Close the document for composition.
    ///
    /// Fails with [`Error::UnclosedGroups`] if any group is still open.
    /// Each group's resource dictionary is written into its form header.
    pub fn finish(mut self) -> Result<ComposedDocument> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedGroups {
                depth: self.stack.depth(),
                names: self.stack.names(),
            });
        }

        for group in &self.groups {
            let resources = self.group_resources.remove(&group.id).unwrap_or_default();
            if resources.is_empty() {
                continue;
            }
            if let Some(obj) = self.objects.get_mut(group.id) {
                obj.header_mut()
                    .insert("Resources".to_string(), resources.to_object());
            }
        }

        log::debug!(
            "Finished composition: {} objects, {} groups, {} pages",
            self.objects.len(),
            self.groups.len(),
            self.pages.len()
        );
        Ok(ComposedDocument {
            objects: self.objects,
            pages: self.pages,
            groups: self.groups,
        })
    }
}

impl OperatorSink for Composer {
    fn write(&mut self, operator: &str) {
        log::trace!("{:?} <- {}", self.redirection.target(), operator);
        match self.redirection.target() {
            Destination::Page(index) => self.pages[index].content.push(operator.to_string()),
            Destination::Group(id) => match self.objects.get_mut(id) {
                Some(obj) => obj.push(operator),
                None => unreachable!("group destination {} 0 R is not in the object table", id),
            },
        }
    }

    fn prepend(&mut self, operator: &str) {
        log::trace!("{:?} <- {} (prepended)", self.redirection.target(), operator);
        match self.redirection.target() {
            Destination::Page(index) => self.pages[index].content.insert(0, operator.to_string()),
            Destination::Group(id) => match self.objects.get_mut(id) {
                Some(obj) => obj.prepend(operator),
                None => unreachable!("group destination {} 0 R is not in the object table", id),
            },
        }
    }

    fn destination(&self) -> Destination {
        self.redirection.target()
    }
}

/// Result of composition, handed to the document writer.
#[derive(Debug)]
pub struct ComposedDocument {
    objects: ObjectTable,
    pages: Vec<PageContent>,
    groups: Vec<Group>,
}

impl ComposedDocument {
    /// Every indirect object created during composition.
    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    /// Pages, in order.
    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    /// Every group created, in creation order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Content stream of a page joined into stream data.
    pub fn page_stream(&self, index: usize) -> Option<String> {
        self.pages.get(index).map(|p| p.content.join("\n"))
    }

    /// All objects as `N 0 obj ... endobj` fragments, in allocation order.
    pub fn render_objects(&self) -> Result<Vec<u8>> {
        self.objects.render_all()
    }
}
