//! Indirect object table.
//!
//! Allocates every indirect object this layer creates and is the single
//! owner of their headers and bodies. Other components hold object ids only.

use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use bytes::Bytes;
use indexmap::IndexMap;

/// Kind of an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Dictionary only, no stream body
    Dictionary,
    /// Dictionary followed by a stream body
    Stream,
    /// Form XObject used as a transparency group; its body is the group's
    /// content stream
    Group,
}

/// An indirect object owned by the [`ObjectTable`].
#[derive(Debug, Clone)]
pub struct IndirectObject {
    id: u32,
    kind: ObjectKind,
    header: Dictionary,
    body: Vec<String>,
}

impl IndirectObject {
    /// Object number.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Object kind.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Header dictionary.
    pub fn header(&self) -> &Dictionary {
        &self.header
    }

    /// Mutable header dictionary.
    pub fn header_mut(&mut self) -> &mut Dictionary {
        &mut self.header
    }

    /// Body fragments (content-stream operators for groups and streams).
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Append a body fragment.
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.body.push(fragment.into());
    }

    /// Insert a body fragment before everything already written.
    pub fn prepend(&mut self, fragment: impl Into<String>) {
        self.body.insert(0, fragment.into());
    }

    /// The object as a PDF value: its header for dictionaries, or a stream
    /// whose data is the body joined by newlines.
    pub fn to_object(&self) -> Object {
        match self.kind {
            ObjectKind::Dictionary => Object::Dictionary(self.header.clone()),
            ObjectKind::Stream | ObjectKind::Group => Object::Stream {
                dict: self.header.clone(),
                data: Bytes::from(self.body.join("\n")),
            },
        }
    }

    /// Header serialized as PDF dictionary syntax.
    pub fn header_syntax(&self) -> Result<String> {
        ObjectSerializer::new().dictionary_syntax(&Object::Dictionary(self.header.clone()))
    }
}

/// Table of indirect objects keyed by object number.
#[derive(Debug, Clone)]
pub struct ObjectTable {
    next_id: u32,
    objects: IndexMap<u32, IndirectObject>,
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTable {
    /// Create an empty table whose first object is number 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create an empty table whose first object is number `first_id`.
    ///
    /// Lets the table share an id space with a document writer that has
    /// already handed out lower numbers.
    pub fn starting_at(first_id: u32) -> Self {
        Self {
            next_id: first_id.max(1),
            objects: IndexMap::new(),
        }
    }

    /// Allocate a new object with a fresh id and an empty body.
    ///
    /// The header is validated through the dictionary serializer, so a
    /// malformed header fails here rather than when the document is written.
    pub fn allocate(&mut self, kind: ObjectKind, header: Object) -> Result<u32> {
        ObjectSerializer::new().dictionary_syntax(&header)?;
        let header = match header {
            Object::Dictionary(dict) => dict,
            other => {
                return Err(Error::UnsupportedValueType {
                    expected: "Dictionary".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        };

        let id = self.next_id;
        self.next_id = id.checked_add(1).expect("indirect object id space exhausted");
        self.objects.insert(
            id,
            IndirectObject {
                id,
                kind,
                header,
                body: Vec::new(),
            },
        );
        log::debug!("Allocated {:?} object {} 0 R", kind, id);
        Ok(id)
    }

    /// Id the next allocation will receive.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Look up an object.
    pub fn get(&self, id: u32) -> Option<&IndirectObject> {
        self.objects.get(&id)
    }

    /// Look up an object mutably.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut IndirectObject> {
        self.objects.get_mut(&id)
    }

    /// Iterate objects in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &IndirectObject> {
        self.objects.values()
    }

    /// Number of allocated objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object has been allocated.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Render one object as an `N 0 obj ... endobj` fragment.
    pub fn render(&self, id: u32) -> Result<Vec<u8>> {
        let obj = self.get(id).ok_or(Error::ObjectNotFound(id, 0))?;
        ObjectSerializer::new().serialize_indirect(id, &obj.to_object())
    }

    /// Render every object, in allocation order.
    pub fn render_all(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for id in self.objects.keys() {
            out.extend(self.render(*id)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext_gstate() -> Object {
        Object::dict([("Type", Object::name("ExtGState"))])
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut table = ObjectTable::new();
        let a = table.allocate(ObjectKind::Dictionary, ext_gstate()).unwrap();
        let b = table.allocate(ObjectKind::Stream, Object::Dictionary(Dictionary::new())).unwrap();
        let c = table.allocate(ObjectKind::Group, ext_gstate()).unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(table.len(), 3);
        assert!(table.get(b).unwrap().body().is_empty());
    }

    #[test]
    fn test_starting_at() {
        let mut table = ObjectTable::starting_at(40);
        assert_eq!(table.allocate(ObjectKind::Dictionary, ext_gstate()).unwrap(), 40);
        assert_eq!(table.next_id(), 41);
    }

    #[test]
    fn test_malformed_header_does_not_consume_an_id() {
        let mut table = ObjectTable::new();
        let bad = Object::dict([("bad key", Object::Integer(1))]);
        assert!(matches!(
            table.allocate(ObjectKind::Dictionary, bad),
            Err(Error::MalformedDictionaryKey(_))
        ));
        assert!(table.is_empty());
        assert_eq!(table.next_id(), 1);
    }

    #[test]
    fn test_non_dictionary_header_rejected() {
        let mut table = ObjectTable::new();
        assert!(matches!(
            table.allocate(ObjectKind::Dictionary, Object::Integer(1)),
            Err(Error::UnsupportedValueType { .. })
        ));
    }

    #[test]
    fn test_body_push_and_prepend() {
        let mut table = ObjectTable::new();
        let id = table.allocate(ObjectKind::Group, ext_gstate()).unwrap();
        let obj = table.get_mut(id).unwrap();
        obj.push("x");
        obj.push("y");
        obj.prepend("/MASK1 gs");
        assert_eq!(obj.body(), ["/MASK1 gs", "x", "y"]);
    }

    #[test]
    fn test_render_group_object() {
        let mut table = ObjectTable::new();
        let id = table.allocate(ObjectKind::Group, ext_gstate()).unwrap();
        table.get_mut(id).unwrap().push("0 0 m");
        let text = String::from_utf8(table.render(id).unwrap()).unwrap();
        assert_eq!(
            text,
            "1 0 obj\n<</Type /ExtGState /Length 5 >>\nstream\n0 0 m\nendstream\nendobj\n"
        );
    }

    #[test]
    fn test_to_object_by_kind() {
        let mut table = ObjectTable::new();
        let dict = table.allocate(ObjectKind::Dictionary, ext_gstate()).unwrap();
        let group = table.allocate(ObjectKind::Group, ext_gstate()).unwrap();
        table.get_mut(group).unwrap().push("a");
        table.get_mut(group).unwrap().push("b");

        assert_eq!(table.get(dict).unwrap().to_object(), ext_gstate());
        match table.get(group).unwrap().to_object() {
            Object::Stream { dict, data } => {
                assert_eq!(dict.get("Type"), Some(&Object::name("ExtGState")));
                assert_eq!(&data[..], b"a\nb");
            },
            other => panic!("expected a stream, got {:?}", other),
        }
    }

    #[test]
    fn test_render_missing_object() {
        let table = ObjectTable::new();
        assert!(matches!(table.render(5), Err(Error::ObjectNotFound(5, 0))));
    }

    #[test]
    fn test_header_syntax() {
        let mut table = ObjectTable::new();
        let id = table.allocate(ObjectKind::Dictionary, ext_gstate()).unwrap();
        assert_eq!(table.get(id).unwrap().header_syntax().unwrap(), "<</Type /ExtGState >> ");
    }
}
