//! Configuration for a composition context.

use crate::error::Result;
use crate::writer::GroupOptions;
use serde::Deserialize;

/// Composer configuration.
///
/// # Example
///
/// ```
/// use pdf_compose::config::ComposerConfig;
///
/// let config = ComposerConfig::from_json(r#"{"first_object_id": 20}"#).unwrap();
/// assert_eq!(config.first_object_id, 20);
/// assert!(!config.init_blend_modes);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// First object number handed out by the object table.
    pub first_object_id: u32,

    /// Create the 16 blend mode states on page 0 when the composer is built.
    pub init_blend_modes: bool,

    /// Options used by `open_group` when none are given.
    pub default_group: GroupOptions,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposerConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            first_object_id: 1,
            init_blend_modes: false,
            default_group: GroupOptions::default(),
        }
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the first object number.
    pub fn with_first_object_id(mut self, id: u32) -> Self {
        self.first_object_id = id;
        self
    }

    /// Create blend mode states at construction.
    pub fn with_blend_modes(mut self, enable: bool) -> Self {
        self.init_blend_modes = enable;
        self
    }

    /// Set the default group options.
    pub fn with_default_group(mut self, options: GroupOptions) -> Self {
        self.default_group = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let config = ComposerConfig::default();
        assert_eq!(config.first_object_id, 1);
        assert!(!config.init_blend_modes);
        assert_eq!(config.default_group, GroupOptions::default());
    }

    #[test]
    fn test_from_json_nested_group_defaults() {
        let config = ComposerConfig::from_json(
            r#"{"init_blend_modes": true, "default_group": {"isolated": false}}"#,
        )
        .unwrap();
        assert!(config.init_blend_modes);
        assert!(!config.default_group.isolated);
        assert!(config.default_group.knockout);
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(matches!(
            ComposerConfig::from_json("{\"first_object_id\": \"one\"}"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_builder_setters() {
        let config = ComposerConfig::new()
            .with_first_object_id(7)
            .with_blend_modes(true)
            .with_default_group(GroupOptions::default().with_knockout(false));
        assert_eq!(config.first_object_id, 7);
        assert!(config.init_blend_modes);
        assert!(!config.default_group.knockout);
    }
}
