//! PDF dictionary serialization.
//!
//! Converts ordered [`Object`] values into PDF syntax following
//! ISO 32000-1:2008, Section 7.3. Entries are written in the order the
//! dictionary holds them; nothing is sorted.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};

/// Serialize a dictionary object to PDF dictionary syntax.
///
/// Shorthand for [`ObjectSerializer::dictionary_syntax`].
pub fn to_dictionary_syntax(value: &Object) -> Result<String> {
    ObjectSerializer::new().dictionary_syntax(value)
}

/// Serializer for PDF dictionaries and indirect-object fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize a top-level dictionary.
    ///
    /// Every entry is written as `/Key value ` and the closing `>>` is
    /// followed by one space, so `{Type: Pattern, N: 2}` becomes
    /// `<</Type /Pattern /N 2 >> `.
    pub fn dictionary_syntax(&self, value: &Object) -> Result<String> {
        let dict = match value {
            Object::Dictionary(dict) => dict,
            other => {
                return Err(Error::UnsupportedValueType {
                    expected: "Dictionary".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        };
        let mut out = String::new();
        self.write_dictionary(&mut out, dict)?;
        out.push(' ');
        Ok(out)
    }

    /// Serialize any direct object.
    pub fn value_syntax(&self, value: &Object) -> Result<String> {
        let mut out = String::new();
        self.write_value(&mut out, value)?;
        Ok(out)
    }

    /// Serialize an indirect object definition.
    ///
    /// A dictionary becomes `{id} 0 obj\n<<...>>\nendobj\n`; a stream becomes
    /// `{id} 0 obj\n<<... /Length n >>\nstream\n{data}\nendstream\nendobj\n`.
    /// A stream's `/Length` is always recomputed from its data.
    pub fn serialize_indirect(&self, id: u32, object: &Object) -> Result<Vec<u8>> {
        let mut out = format!("{} 0 obj\n", id);
        match object {
            Object::Dictionary(dict) => {
                self.write_dictionary(&mut out, dict)?;
                out.push_str("\nendobj\n");
                Ok(out.into_bytes())
            },
            Object::Stream { dict, data } => {
                let mut dict = dict.clone();
                dict.insert("Length".to_string(), Object::Integer(data.len() as i64));
                self.write_dictionary(&mut out, &dict)?;
                out.push_str("\nstream\n");
                let mut buf = out.into_bytes();
                buf.extend_from_slice(data);
                buf.extend_from_slice(b"\nendstream\nendobj\n");
                Ok(buf)
            },
            other => Err(Error::UnsupportedValueType {
                expected: "Dictionary or Stream".to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    fn write_value(&self, out: &mut String, value: &Object) -> Result<()> {
        match value {
            Object::Null => out.push_str("null"),
            Object::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Object::Integer(i) => out.push_str(&i.to_string()),
            Object::Real(r) if !r.is_finite() => {
                return Err(Error::UnsupportedValueType {
                    expected: "finite number".to_string(),
                    found: r.to_string(),
                })
            },
            Object::Real(r) => out.push_str(&r.to_string()),
            Object::String(s) => write_string(out, s),
            Object::Name(n) => write_name(out, n),
            Object::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    self.write_value(out, item)?;
                }
                out.push(']');
            },
            Object::Dictionary(dict) => self.write_dictionary(out, dict)?,
            Object::Stream { .. } => {
                return Err(Error::UnsupportedValueType {
                    expected: "direct object".to_string(),
                    found: value.type_name().to_string(),
                })
            },
            Object::Reference(r) => out.push_str(&r.to_string()),
        }
        Ok(())
    }

    fn write_dictionary(&self, out: &mut String, dict: &Dictionary) -> Result<()> {
        out.push_str("<<");
        for (key, value) in dict {
            validate_key(key)?;
            out.push('/');
            out.push_str(key);
            out.push(' ');
            self.write_value(out, value)?;
            out.push(' ');
        }
        out.push_str(">>");
        Ok(())
    }
}

/// Reject keys that cannot be written verbatim as a PDF name token.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let regular = |b: u8| {
        (0x21..=0x7E).contains(&b)
            && !matches!(
                b,
                b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
            )
    };
    if key.is_empty() || !key.bytes().all(regular) {
        return Err(Error::MalformedDictionaryKey(key.to_string()));
    }
    Ok(())
}

/// Write a PDF name.
///
/// Names start with `/` and escape irregular characters with `#xx`.
fn write_name(out: &mut String, name: &str) {
    out.push('/');
    for byte in name.bytes() {
        match byte {
            b'!'
            | b'"'
            | b'$'..=b'&'
            | b'\''
            | b'*'..=b'.'
            | b'0'..=b'9'
            | b';'
            | b'?'
            | b'@'
            | b'A'..=b'Z'
            | b'^'..=b'z'
            | b'|'
            | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("#{:02X}", byte)),
        }
    }
}

/// Write a PDF string.
///
/// Printable ASCII uses literal syntax `(...)`, anything else hex `<...>`.
fn write_string(out: &mut String, data: &[u8]) {
    let is_printable = data
        .iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

    if is_printable {
        out.push('(');
        for &byte in data {
            match byte {
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                b'\\' => out.push_str("\\\\"),
                b'\n' => out.push_str("\\n"),
                b'\r' => out.push_str("\\r"),
                b'\t' => out.push_str("\\t"),
                _ => out.push(byte as char),
            }
        }
        out.push(')');
    } else {
        out.push('<');
        for byte in data {
            out.push_str(&format!("{:02X}", byte));
        }
        out.push('>');
    }
}
