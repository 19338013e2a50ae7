//! Transparency groups and the group stack.
//!
//! A group is a form XObject whose content stream receives every operator
//! written while it is on top of the stack (ISO 32000-1:2008, Section 11.6.6).
//! Once closed it can be painted with `Do` or used as a soft mask.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use serde::Deserialize;
use std::str::FromStr;

/// Options for opening a transparency group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupOptions {
    /// Resource name; `GROUP<id>` when absent
    pub name: Option<String>,
    /// Isolated group (`/I`)
    pub isolated: bool,
    /// Knockout group (`/K`)
    pub knockout: bool,
    /// Mask form: no `/Group` entry is written
    pub is_mask: bool,
    /// Explicit `[llx lly urx ury]` bounds; the first page's box when absent
    pub bbox: Option<[f64; 4]>,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            name: None,
            isolated: true,
            knockout: true,
            is_mask: false,
            bbox: None,
        }
    }
}

impl From<&str> for GroupOptions {
    fn from(name: &str) -> Self {
        GroupOptions::named(name)
    }
}

impl GroupOptions {
    /// Default options carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the group name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the isolated flag.
    pub fn with_isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    /// Set the knockout flag.
    pub fn with_knockout(mut self, knockout: bool) -> Self {
        self.knockout = knockout;
        self
    }

    /// Mark the group as a mask form.
    pub fn with_mask(mut self, is_mask: bool) -> Self {
        self.is_mask = is_mask;
        self
    }

    /// Set explicit bounds.
    pub fn with_bbox(mut self, llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        self.bbox = Some([llx, lly, urx, ury]);
        self
    }

    /// Form XObject header for a group with bounds `bbox`.
    ///
    /// `<</Type /XObject /Subtype /Form /FormType 1 /BBox [...] /Group <<...>> >>`,
    /// with the `/Group` entry left out for mask forms.
    pub fn form_header(&self, bbox: [f64; 4]) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Form"));
        dict.insert("FormType".to_string(), Object::Integer(1));
        dict.insert("BBox".to_string(), Object::reals(&bbox));
        if !self.is_mask {
            dict.insert(
                "Group".to_string(),
                Object::dict([
                    ("S", Object::name("Transparency")),
                    ("CS", Object::name("DeviceRGB")),
                    ("I", Object::Boolean(self.isolated)),
                    ("K", Object::Boolean(self.knockout)),
                ]),
            );
        }
        Object::Dictionary(dict)
    }
}

/// Handle to a transparency group.
///
/// The content stream itself lives in the object table; read it with
/// [`Composer::group_content`](super::Composer::group_content).
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Object number of the form XObject
    pub id: u32,
    /// Resource name, unique within the document
    pub name: String,
    /// Isolated flag
    pub isolated: bool,
    /// Knockout flag
    pub knockout: bool,
    /// Mask form
    pub is_mask: bool,
    /// Form bounds
    pub bbox: [f64; 4],
}

/// A group given by handle or by name.
#[derive(Debug, Clone, Copy)]
pub enum GroupRef<'a> {
    /// Group handle
    Handle(&'a Group),
    /// Group name
    Name(&'a str),
}

impl<'a> From<&'a Group> for GroupRef<'a> {
    fn from(group: &'a Group) -> Self {
        GroupRef::Handle(group)
    }
}

impl<'a> From<&'a str> for GroupRef<'a> {
    fn from(name: &'a str) -> Self {
        GroupRef::Name(name)
    }
}

/// LIFO stack of open groups.
#[derive(Debug, Clone, Default)]
pub struct GroupStack {
    groups: Vec<Group>,
}

impl GroupStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a newly opened group.
    pub fn push(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Pop the innermost group.
    pub fn pop(&mut self) -> Result<Group> {
        self.groups.pop().ok_or(Error::EmptyGroupStack)
    }

    /// Innermost open group.
    pub fn top(&self) -> Option<&Group> {
        self.groups.last()
    }

    /// Number of open groups.
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is open.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether the group with object number `id` is open.
    pub fn contains(&self, id: u32) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    /// Names of the open groups, outermost first.
    pub fn names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }
}

/// Canvas composite operations (HTML canvas `globalCompositeOperation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOperation {
    /// `normal`
    Normal,
    /// `source-over` (canvas default)
    #[default]
    SourceOver,
    /// `source-in`
    SourceIn,
    /// `source-out`
    SourceOut,
    /// `source-atop`
    SourceAtop,
    /// `destination-over`
    DestinationOver,
    /// `destination-in`
    DestinationIn,
    /// `destination-out`
    DestinationOut,
    /// `destination-atop`
    DestinationAtop,
    /// `lighter`
    Lighter,
    /// `copy`
    Copy,
    /// `xor`
    Xor,
}

impl CompositeOperation {
    /// Canvas name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOperation::Normal => "normal",
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::SourceIn => "source-in",
            CompositeOperation::SourceOut => "source-out",
            CompositeOperation::SourceAtop => "source-atop",
            CompositeOperation::DestinationOver => "destination-over",
            CompositeOperation::DestinationIn => "destination-in",
            CompositeOperation::DestinationOut => "destination-out",
            CompositeOperation::DestinationAtop => "destination-atop",
            CompositeOperation::Lighter => "lighter",
            CompositeOperation::Copy => "copy",
            CompositeOperation::Xor => "xor",
        }
    }
}

impl FromStr for CompositeOperation {
    type Err = Error;

    /// An empty string is the canvas default, `source-over`.
    fn from_str(s: &str) -> Result<Self> {
        let op = match s {
            "" | "source-over" => CompositeOperation::SourceOver,
            "normal" => CompositeOperation::Normal,
            "source-in" => CompositeOperation::SourceIn,
            "source-out" => CompositeOperation::SourceOut,
            "source-atop" => CompositeOperation::SourceAtop,
            "destination-over" => CompositeOperation::DestinationOver,
            "destination-in" => CompositeOperation::DestinationIn,
            "destination-out" => CompositeOperation::DestinationOut,
            "destination-atop" => CompositeOperation::DestinationAtop,
            "lighter" => CompositeOperation::Lighter,
            "copy" => CompositeOperation::Copy,
            "xor" => CompositeOperation::Xor,
            other => return Err(Error::UnsupportedCompositeMode(other.to_string())),
        };
        Ok(op)
    }
}

/// State read from the drawing layer when a group is painted.
pub trait CanvasState {
    /// Current `globalCompositeOperation` name.
    fn composite_operation(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object_serializer::to_dictionary_syntax;

    fn group(id: u32, name: &str) -> Group {
        Group {
            id,
            name: name.to_string(),
            isolated: true,
            knockout: true,
            is_mask: false,
            bbox: [0.0, 0.0, 10.0, 10.0],
        }
    }

    #[test]
    fn test_default_options() {
        let opts = GroupOptions::default();
        assert_eq!(opts.name, None);
        assert!(opts.isolated);
        assert!(opts.knockout);
        assert!(!opts.is_mask);
        assert_eq!(GroupOptions::from("A").name.as_deref(), Some("A"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: GroupOptions = serde_json::from_str(r#"{"name": "G", "knockout": false}"#).unwrap();
        assert_eq!(opts.name.as_deref(), Some("G"));
        assert!(opts.isolated);
        assert!(!opts.knockout);
        assert!(!opts.is_mask);
    }

    #[test]
    fn test_form_header_with_group_entry() {
        let header = GroupOptions::default()
            .with_knockout(false)
            .form_header([0.0, 0.0, 612.0, 792.0]);
        assert_eq!(
            to_dictionary_syntax(&header).unwrap(),
            "<</Type /XObject /Subtype /Form /FormType 1 /BBox [0 0 612 792] \
             /Group <</S /Transparency /CS /DeviceRGB /I true /K false >> >> "
        );
    }

    #[test]
    fn test_mask_form_has_no_group_entry() {
        let header = GroupOptions::default()
            .with_mask(true)
            .form_header([0.0, 0.0, 1.0, 1.0]);
        assert!(!header.as_dict().unwrap().contains_key("Group"));
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut stack = GroupStack::new();
        stack.push(group(1, "A"));
        stack.push(group(2, "B"));
        assert_eq!(stack.depth(), 2);
        assert!(stack.contains(1));
        assert_eq!(stack.names(), vec!["A", "B"]);
        assert_eq!(stack.pop().unwrap().name, "B");
        assert_eq!(stack.top().unwrap().name, "A");
        assert_eq!(stack.pop().unwrap().name, "A");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_empty_stack() {
        let mut stack = GroupStack::new();
        assert!(matches!(stack.pop(), Err(Error::EmptyGroupStack)));
    }

    #[test]
    fn test_composite_operation_parse() {
        assert_eq!("".parse::<CompositeOperation>().unwrap(), CompositeOperation::SourceOver);
        assert_eq!("normal".parse::<CompositeOperation>().unwrap(), CompositeOperation::Normal);
        assert_eq!(
            "destination-in".parse::<CompositeOperation>().unwrap(),
            CompositeOperation::DestinationIn
        );
        assert!(matches!(
            "plus-darker".parse::<CompositeOperation>(),
            Err(Error::UnsupportedCompositeMode(_))
        ));
        assert_eq!(CompositeOperation::Xor.as_str(), "xor");
    }
}
