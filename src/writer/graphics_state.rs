//! Extended Graphics State (ExtGState) for opacity, blend modes and soft masks.
//!
//! [`GraphicsStateRegistry`] owns the reusable states of a document:
//! - one opacity state per distinct opacity value
//! - one state per standard blend mode, created by `init_blend_modes`
//! - one soft-mask state per mask application (never shared, each one
//!   points at a specific group)
//!
//! # Example
//!
//! ```
//! use pdf_compose::writer::{BlendMode, ExtGStateBuilder};
//!
//! let gs = ExtGStateBuilder::new()
//!     .fill_alpha(1.0)
//!     .stroke_alpha(1.0)
//!     .blend_mode(BlendMode::Multiply)
//!     .build();
//! assert!(gs.as_dict().unwrap().contains_key("BM"));
//! ```

use super::object_table::{ObjectKind, ObjectTable};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashMap;
use std::str::FromStr;

/// Standard PDF blend modes (ISO 32000-1:2008, Table 136 and 137).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Normal blend (default)
    #[default]
    Normal,
    /// Multiply
    Multiply,
    /// Screen
    Screen,
    /// Overlay
    Overlay,
    /// Darken
    Darken,
    /// Lighten
    Lighten,
    /// Color dodge
    ColorDodge,
    /// Color burn
    ColorBurn,
    /// Hard light
    HardLight,
    /// Soft light
    SoftLight,
    /// Difference
    Difference,
    /// Exclusion
    Exclusion,
    /// Hue (non-separable)
    Hue,
    /// Saturation (non-separable)
    Saturation,
    /// Color (non-separable)
    Color,
    /// Luminosity (non-separable)
    Luminosity,
}

impl BlendMode {
    /// All standard modes, in the order the PDF reference lists them.
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    /// Get the PDF name for this blend mode.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "ColorDodge",
            BlendMode::ColorBurn => "ColorBurn",
            BlendMode::HardLight => "HardLight",
            BlendMode::SoftLight => "SoftLight",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
            BlendMode::Hue => "Hue",
            BlendMode::Saturation => "Saturation",
            BlendMode::Color => "Color",
            BlendMode::Luminosity => "Luminosity",
        }
    }
}

impl FromStr for BlendMode {
    type Err = Error;

    /// Case-insensitive: `"MULTIPLY"`, `"multiply"` and `"Multiply"` all match.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        BlendMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_pdf_name().to_ascii_uppercase() == upper)
            .ok_or_else(|| Error::UnknownBlendMode(s.to_string()))
    }
}

/// Soft mask configuration for transparency effects.
#[derive(Debug, Clone)]
pub enum SoftMask {
    /// No soft mask (None)
    None,
    /// Soft mask from a transparency group
    Group {
        /// Transparency group XObject
        group: ObjectRef,
        /// Subtype (Alpha or Luminosity)
        subtype: SoftMaskSubtype,
    },
}

/// Soft mask subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftMaskSubtype {
    /// Use alpha values from the group
    Alpha,
    /// Use luminosity values from the group
    Luminosity,
}

impl SoftMaskSubtype {
    fn as_pdf_name(&self) -> &'static str {
        match self {
            SoftMaskSubtype::Alpha => "Alpha",
            SoftMaskSubtype::Luminosity => "Luminosity",
        }
    }
}

/// Builder for Extended Graphics State dictionaries.
///
/// Entries are emitted in the order the setters are called, after `/Type`.
#[derive(Debug, Clone)]
pub struct ExtGStateBuilder {
    dict: Dictionary,
}

impl Default for ExtGStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtGStateBuilder {
    /// Create a new ExtGState builder.
    pub fn new() -> Self {
        let mut dict = Dictionary::new();
        dict.insert("Type".to_string(), Object::name("ExtGState"));
        Self { dict }
    }

    fn set(mut self, key: &str, value: Object) -> Self {
        self.dict.insert(key.to_string(), value);
        self
    }

    /// Set fill alpha (ca).
    pub fn fill_alpha(self, alpha: f64) -> Self {
        self.set("ca", Object::Real(alpha))
    }

    /// Set stroke alpha (CA).
    pub fn stroke_alpha(self, alpha: f64) -> Self {
        self.set("CA", Object::Real(alpha))
    }

    /// Set blend mode (BM).
    pub fn blend_mode(self, mode: BlendMode) -> Self {
        self.set("BM", Object::name(mode.as_pdf_name()))
    }

    /// Set the alpha source flag (AIS).
    pub fn alpha_source(self, shape: bool) -> Self {
        self.set("AIS", Object::Boolean(shape))
    }

    /// Set soft mask (SMask).
    pub fn soft_mask(self, mask: SoftMask) -> Self {
        let value = match mask {
            SoftMask::None => Object::name("None"),
            SoftMask::Group { group, subtype } => Object::dict([
                ("S", Object::name(subtype.as_pdf_name())),
                ("G", Object::Reference(group)),
            ]),
        };
        self.set("SMask", value)
    }

    /// Build the ExtGState dictionary as a PDF Object.
    pub fn build(self) -> Object {
        Object::Dictionary(self.dict)
    }
}

/// Deduplicating store of the reusable graphics states of one document.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStateRegistry {
    /// Opacity state per exact opacity value (keyed by its bit pattern)
    opacity: HashMap<u64, u32>,
    /// State per blend mode
    blend_modes: HashMap<BlendMode, u32>,
}

impl GraphicsStateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Object holding `/CA value /ca value`, created on first use.
    ///
    /// Values are matched exactly: `0.5` and `0.50000001` get separate
    /// objects.
    pub fn opacity_state(&mut self, table: &mut ObjectTable, value: f64) -> Result<u32> {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::OpacityOutOfRange(value));
        }
        // -0.0 and 0.0 are the same opacity
        let key = (value + 0.0).to_bits();
        if let Some(&id) = self.opacity.get(&key) {
            return Ok(id);
        }

        let header = ExtGStateBuilder::new()
            .stroke_alpha(value)
            .fill_alpha(value)
            .build();
        let id = table.allocate(ObjectKind::Dictionary, header)?;
        self.opacity.insert(key, id);
        log::debug!("Created opacity state {} 0 R for {}", id, value);
        Ok(id)
    }

    /// Number of distinct opacity states created so far.
    pub fn opacity_state_count(&self) -> usize {
        self.opacity.len()
    }

    /// Create one state per standard blend mode.
    ///
    /// Each call creates 16 new objects; a second call leaves the first
    /// batch unreferenced by the lookup table.
    pub fn init_blend_modes(&mut self, table: &mut ObjectTable) -> Result<Vec<(BlendMode, u32)>> {
        if !self.blend_modes.is_empty() {
            log::warn!("Blend mode states initialised twice; duplicate objects will be created");
        }
        let mut created = Vec::with_capacity(BlendMode::ALL.len());
        for mode in BlendMode::ALL {
            let header = ExtGStateBuilder::new()
                .fill_alpha(1.0)
                .stroke_alpha(1.0)
                .blend_mode(mode)
                .alpha_source(false)
                .build();
            let id = table.allocate(ObjectKind::Dictionary, header)?;
            self.blend_modes.insert(mode, id);
            created.push((mode, id));
        }
        log::debug!("Created {} blend mode states", created.len());
        Ok(created)
    }

    /// Object holding the state for `mode`, if blend modes were initialised.
    pub fn blend_mode_state(&self, mode: BlendMode) -> Option<u32> {
        self.blend_modes.get(&mode).copied()
    }

    /// Resource name of the state for `mode`, if blend modes were initialised.
    pub fn blend_mode_resource(&self, mode: BlendMode) -> Option<String> {
        self.blend_mode_state(mode).map(blend_mode_name)
    }

    /// Fresh state whose `/SMask` uses the alpha of group `group_id`.
    pub fn soft_mask_state(&mut self, table: &mut ObjectTable, group_id: u32) -> Result<u32> {
        let header = ExtGStateBuilder::new()
            .soft_mask(SoftMask::Group {
                group: ObjectRef::new(group_id, 0),
                subtype: SoftMaskSubtype::Alpha,
            })
            .build();
        let id = table.allocate(ObjectKind::Dictionary, header)?;
        log::debug!("Created soft mask state {} 0 R for group {} 0 R", id, group_id);
        Ok(id)
    }
}

/// Resource name of an opacity state.
pub fn opacity_name(id: u32) -> String {
    format!("GS_O_{}", id)
}

/// Resource name of a blend mode state.
pub fn blend_mode_name(id: u32) -> String {
    format!("GS{}", id)
}

/// Resource name of a soft mask state.
pub fn soft_mask_name(id: u32) -> String {
    format!("MASK{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object_serializer::to_dictionary_syntax;

    #[test]
    fn test_blend_mode_from_str_ignores_case() {
        assert_eq!("MULTIPLY".parse::<BlendMode>().unwrap(), BlendMode::Multiply);
        assert_eq!("colordodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
        assert_eq!("Luminosity".parse::<BlendMode>().unwrap(), BlendMode::Luminosity);
        assert!(matches!("Plus".parse::<BlendMode>(), Err(Error::UnknownBlendMode(_))));
    }

    #[test]
    fn test_builder_keeps_call_order() {
        let gs = ExtGStateBuilder::new()
            .fill_alpha(1.0)
            .stroke_alpha(1.0)
            .blend_mode(BlendMode::Screen)
            .alpha_source(false)
            .build();
        assert_eq!(
            to_dictionary_syntax(&gs).unwrap(),
            "<</Type /ExtGState /ca 1 /CA 1 /BM /Screen /AIS false >> "
        );
    }

    #[test]
    fn test_soft_mask_entry() {
        let gs = ExtGStateBuilder::new()
            .soft_mask(SoftMask::Group {
                group: ObjectRef::new(12, 0),
                subtype: SoftMaskSubtype::Alpha,
            })
            .build();
        assert_eq!(
            to_dictionary_syntax(&gs).unwrap(),
            "<</Type /ExtGState /SMask <</S /Alpha /G 12 0 R >> >> "
        );

        let none = ExtGStateBuilder::new().soft_mask(SoftMask::None).build();
        assert_eq!(none.as_dict().unwrap().get("SMask").unwrap().as_name(), Some("None"));
    }

    #[test]
    fn test_opacity_state_is_deduplicated() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        let a = registry.opacity_state(&mut table, 0.5).unwrap();
        let b = registry.opacity_state(&mut table, 0.5).unwrap();
        let c = registry.opacity_state(&mut table, 0.50000001).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
        assert_eq!(registry.opacity_state_count(), 2);
    }

    #[test]
    fn test_negative_zero_opacity_shares_state() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        let a = registry.opacity_state(&mut table, 0.0).unwrap();
        let b = registry.opacity_state(&mut table, -0.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_opacity_out_of_range() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                registry.opacity_state(&mut table, bad),
                Err(Error::OpacityOutOfRange(_))
            ));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_opacity_state_content() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        let id = registry.opacity_state(&mut table, 0.25).unwrap();
        assert_eq!(
            table.get(id).unwrap().header_syntax().unwrap(),
            "<</Type /ExtGState /CA 0.25 /ca 0.25 >> "
        );
    }

    #[test]
    fn test_init_blend_modes_creates_sixteen_states() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        let created = registry.init_blend_modes(&mut table).unwrap();
        assert_eq!(created.len(), 16);
        assert_eq!(table.len(), 16);
        for (mode, id) in created {
            assert_eq!(registry.blend_mode_state(mode), Some(id));
            assert_eq!(registry.blend_mode_resource(mode), Some(blend_mode_name(id)));
        }
    }

    #[test]
    fn test_init_blend_modes_twice_duplicates() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        registry.init_blend_modes(&mut table).unwrap();
        registry.init_blend_modes(&mut table).unwrap();
        assert_eq!(table.len(), 32);
        assert_eq!(registry.blend_mode_resource(BlendMode::Normal).as_deref(), Some("GS17"));
    }

    #[test]
    fn test_soft_mask_states_are_never_shared() {
        let mut table = ObjectTable::new();
        let mut registry = GraphicsStateRegistry::new();
        let a = registry.soft_mask_state(&mut table, 3).unwrap();
        let b = registry.soft_mask_state(&mut table, 3).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(opacity_name(4), "GS_O_4");
        assert_eq!(blend_mode_name(4), "GS4");
        assert_eq!(soft_mask_name(4), "MASK4");
    }
}
