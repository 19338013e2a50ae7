//! Error types for the composition layer.
//!
//! Every variant is a caller error: it is raised synchronously at the call
//! site and never replaced by a fallback that would still produce a
//! structurally valid but visually wrong PDF.

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while composing content streams.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `close_group` was called with no open group
    #[error("Cannot close a group: the group stack is empty")]
    EmptyGroupStack,

    /// Group drawn under a composite operation this layer cannot express
    #[error("Unsupported composite operation for drawing a group: '{0}'")]
    UnsupportedCompositeMode(String),

    /// Dictionary key that is not a valid PDF name token
    #[error("Malformed dictionary key: {0:?}")]
    MalformedDictionaryKey(String),

    /// Value that cannot be written as direct dictionary syntax
    #[error("Unsupported value type: expected {expected}, found {found}")]
    UnsupportedValueType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Opacity outside the closed unit interval
    #[error("Opacity out of range: {0} (expected a value in [0, 1])")]
    OpacityOutOfRange(f64),

    /// The document was finished while groups were still open
    #[error("Cannot finish: {depth} group(s) still open ({})", .names.join(", "))]
    UnclosedGroups {
        /// Stack depth at finish time
        depth: usize,
        /// Names of the open groups, bottom of the stack first
        names: Vec<String>,
    },

    /// No group with the given name was ever opened
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// A group with the given name already exists in this document
    #[error("Duplicate group name: {0}")]
    DuplicateGroupName(String),

    /// The group is still on the stack and cannot be painted yet
    #[error("Group is still open and cannot be drawn: {0}")]
    GroupStillOpen(String),

    /// Page index does not exist
    #[error("Page index {index} out of range (document has {count} page(s))")]
    PageOutOfRange {
        /// Requested page index
        index: usize,
        /// Number of pages
        count: usize,
    },

    /// Not one of the 16 standard PDF blend modes
    #[error("Unknown blend mode: {0}")]
    UnknownBlendMode(String),

    /// Referenced object not found in the object table
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_stack_error() {
        let msg = format!("{}", Error::EmptyGroupStack);
        assert!(msg.contains("group stack is empty"));
    }

    #[test]
    fn test_unsupported_composite_mode_error() {
        let err = Error::UnsupportedCompositeMode("xor".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("xor"));
    }

    #[test]
    fn test_unclosed_groups_lists_names() {
        let err = Error::UnclosedGroups {
            depth: 2,
            names: vec!["A".to_string(), "B".to_string()],
        };
        let msg = format!("{}", err);
        assert!(msg.contains("2 group(s)"));
        assert!(msg.contains("A, B"));
    }

    #[test]
    fn test_object_not_found_error() {
        let err = Error::ObjectNotFound(10, 0);
        let msg = format!("{}", err);
        assert!(msg.contains("10 0 R"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
