//! Resource dictionaries.
//!
//! A content stream can only refer by name to resources listed in the
//! resource dictionary of the page or form that owns it, so registrations
//! are always made against an explicit [`ResourceScope`].

use super::content_sink::Destination;
use crate::object::{Dictionary, Object};
use indexmap::IndexMap;

/// Owner of a resource dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    /// Resources of the page at this index
    Page(usize),
    /// Resources of the group form with this object id
    Group(u32),
}

impl From<Destination> for ResourceScope {
    fn from(dest: Destination) -> Self {
        match dest {
            Destination::Page(index) => ResourceScope::Page(index),
            Destination::Group(id) => ResourceScope::Group(id),
        }
    }
}

/// Resource category inside a resource dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `/ExtGState`
    ExtGState,
    /// `/Pattern`
    Pattern,
    /// `/XObject`
    XObject,
}

impl ResourceKind {
    /// Key of this category in a resource dictionary.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            ResourceKind::ExtGState => "ExtGState",
            ResourceKind::Pattern => "Pattern",
            ResourceKind::XObject => "XObject",
        }
    }
}

/// Name-to-object mappings of one scope, per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDictionary {
    ext_g_state: IndexMap<String, u32>,
    pattern: IndexMap<String, u32>,
    x_object: IndexMap<String, u32>,
}

impl ResourceDictionary {
    /// Create an empty resource dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, kind: ResourceKind) -> &IndexMap<String, u32> {
        match kind {
            ResourceKind::ExtGState => &self.ext_g_state,
            ResourceKind::Pattern => &self.pattern,
            ResourceKind::XObject => &self.x_object,
        }
    }

    fn entries_mut(&mut self, kind: ResourceKind) -> &mut IndexMap<String, u32> {
        match kind {
            ResourceKind::ExtGState => &mut self.ext_g_state,
            ResourceKind::Pattern => &mut self.pattern,
            ResourceKind::XObject => &mut self.x_object,
        }
    }

    /// Register `name` for object `id`. Re-registering a name replaces it.
    pub fn register(&mut self, kind: ResourceKind, name: impl Into<String>, id: u32) {
        let name = name.into();
        if let Some(previous) = self.entries_mut(kind).insert(name.clone(), id) {
            if previous != id {
                log::warn!(
                    "Resource /{} /{} rebound from {} 0 R to {} 0 R",
                    kind.as_pdf_name(),
                    name,
                    previous,
                    id
                );
            }
        }
    }

    /// Object id registered under `name`.
    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<u32> {
        self.entries(kind).get(name).copied()
    }

    /// Names registered in a category, in registration order.
    pub fn names(&self, kind: ResourceKind) -> impl Iterator<Item = &str> {
        self.entries(kind).keys().map(String::as_str)
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.ext_g_state.is_empty() && self.pattern.is_empty() && self.x_object.is_empty()
    }

    /// Build the `/Resources` dictionary. Empty categories are omitted.
    pub fn to_object(&self) -> Object {
        let mut dict = Dictionary::new();
        for kind in [ResourceKind::ExtGState, ResourceKind::Pattern, ResourceKind::XObject] {
            let entries = self.entries(kind);
            if entries.is_empty() {
                continue;
            }
            let sub: Dictionary = entries
                .iter()
                .map(|(name, id)| (name.clone(), Object::reference(*id)))
                .collect();
            dict.insert(kind.as_pdf_name().to_string(), Object::Dictionary(sub));
        }
        Object::Dictionary(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object_serializer::to_dictionary_syntax;

    #[test]
    fn test_scope_from_destination() {
        assert_eq!(ResourceScope::from(Destination::Page(1)), ResourceScope::Page(1));
        assert_eq!(ResourceScope::from(Destination::Group(9)), ResourceScope::Group(9));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut res = ResourceDictionary::new();
        assert!(res.is_empty());
        res.register(ResourceKind::ExtGState, "GS_O_3", 3);
        res.register(ResourceKind::XObject, "G1", 5);
        assert_eq!(res.get(ResourceKind::ExtGState, "GS_O_3"), Some(3));
        assert_eq!(res.get(ResourceKind::Pattern, "GS_O_3"), None);
        assert!(!res.is_empty());
    }

    #[test]
    fn test_reregistering_same_name_keeps_one_entry() {
        let mut res = ResourceDictionary::new();
        res.register(ResourceKind::ExtGState, "GS1", 1);
        res.register(ResourceKind::ExtGState, "GS1", 1);
        assert_eq!(res.names(ResourceKind::ExtGState).count(), 1);
    }

    #[test]
    fn test_to_object_omits_empty_categories() {
        let mut res = ResourceDictionary::new();
        res.register(ResourceKind::ExtGState, "MASK4", 4);
        res.register(ResourceKind::XObject, "A", 2);
        assert_eq!(
            to_dictionary_syntax(&res.to_object()).unwrap(),
            "<</ExtGState <</MASK4 4 0 R >> /XObject <</A 2 0 R >> >> "
        );
    }
}
