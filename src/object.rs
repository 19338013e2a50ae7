//! PDF object types.
//!
//! Dictionaries keep their entries in insertion order: the order in which a
//! caller builds a dictionary is the order in which its entries are written.

use indexmap::IndexMap;

/// Insertion-ordered PDF dictionary.
pub type Dictionary = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (written with a leading /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (ordered key-value pairs)
    Dictionary(Dictionary),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dictionary,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Create a Name object.
    pub fn name(s: impl Into<String>) -> Object {
        Object::Name(s.into())
    }

    /// Create a Dictionary object from ordered entries.
    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Object)>) -> Object {
        Object::Dictionary(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create an Array of reals.
    pub fn reals(values: &[f64]) -> Object {
        Object::Array(values.iter().map(|&v| Object::Real(v)).collect())
    }

    /// Create a Reference object to generation 0 of `id`.
    pub fn reference(id: u32) -> Object {
        Object::Reference(ObjectRef::new(id, 0))
    }

    /// Try to cast to real number. Integers widen.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            Object::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }
}
