//! Canonical in-memory values produced by `unpack` and `safe_parse`

use bytes::Bytes;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::hex_string;

/// A canonical molecule value
///
/// Objects keep their fields in the codec's declared key order, so two
/// values produced by the same codec compare equal exactly when their
/// fields do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent option
    Null,
    /// A single byte
    Byte(u8),
    /// Raw bytes of a `byte_array` or `byte_fixvec`
    Bytes(Bytes),
    /// Members of an array, fixvec or dynvec
    List(Vec<Value>),
    /// Fields of a struct or table, in declared order
    Object(Vec<(String, Value)>),
    /// Selected union variant
    Union(UnionValue),
}

/// The variant name and value of a union
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionValue {
    /// Variant name
    pub variant: String,
    /// Variant value
    pub value: Box<Value>,
}

impl Value {
    /// Build a raw bytes value
    pub fn bytes(bytes: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(bytes))
    }

    /// Build a list value
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build an object value; fields keep the given order
    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a union value
    pub fn union(variant: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Union(UnionValue {
            variant: variant.into(),
            value: Box::new(value.into()),
        })
    }

    /// Short name of the value kind, used in pack errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Byte(_) => "byte",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Union(_) => "union",
        }
    }

    /// Whether this is an absent option
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The byte, if this is one
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Value::Byte(b) => Some(*b),
            _ => None,
        }
    }

    /// The raw bytes, if this is a bytes value
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The members, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The fields, if this is an object
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The variant, if this is a union
    pub fn as_union(&self) -> Option<&UnionValue> {
        match self {
            Value::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Field lookup on an object; `None` for other kinds or absent fields
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// JSON rendering, accepted back by `safe_parse` of the same codec
    ///
    /// Same rendering as the `Serialize` impl.
    pub fn to_json(&self) -> serde_json::Value {
        // Keys are strings and every leaf is a u8, string or null
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Value::Byte(b)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<UnionValue> for Value {
    fn from(u: UnionValue) -> Self {
        Value::Union(u)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Byte(b) => serializer.serialize_u8(*b),
            Value::Bytes(b) => serializer.serialize_str(&hex_string::encode(b)),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Union(u) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &u.variant)?;
                map.serialize_entry("value", &*u.value)?;
                map.end()
            }
        }
    }
}
