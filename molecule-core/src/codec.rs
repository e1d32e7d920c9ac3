//! The shared codec contract
//!
//! Every construct implements [`Codec`]; those whose encoding has a
//! constant length also implement [`FixedSizeCodec`]. Composites hold their
//! members as [`AnyCodec`] handles, which record the size capability so
//! constructors can dispatch on it (see [`vector`](crate::vector::vector)).

use alloc::sync::Arc;
use core::fmt;

use bytes::Bytes;
use serde_json::Value as Json;

use crate::constants::SCHEMA_INDENT;
use crate::error::{CodecError, CodecIssue, PackError, PathSegment, SafeParseResult, ShapeError};
use crate::value::Value;
use crate::writer::BinaryWriter;

/// Operations shared by every codec
///
/// Codecs are immutable once constructed and keep no per-call state, so a
/// single instance can be reused across threads without synchronisation.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Name used in schema text and diagnostics
    fn name(&self) -> &str;

    /// Serialize a canonical value into `writer`
    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError>;

    /// Deserialize exactly `bytes`
    ///
    /// `strict` only changes how tables treat schema-evolution differences
    /// and is passed down to every nested codec.
    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError>;

    /// Validate and normalize an untyped input into a canonical value
    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value>;

    /// Canonical schema declaration of this codec
    fn schema(&self) -> String;

    /// Direct member codecs
    fn dependencies(&self) -> Vec<AnyCodec>;

    /// Serialize a canonical value
    fn pack(&self, value: &Value) -> Result<Bytes, PackError> {
        let mut writer = BinaryWriter::new();
        self.pack_to(value, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Deserialize in non-strict mode
    fn unpack(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        self.unpack_with(bytes, false)
    }

    /// Deserialize in strict mode
    fn unpack_strict(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        self.unpack_with(bytes, true)
    }

    /// `safe_parse`, returning the failure as an error
    fn parse(&self, input: &Json) -> Result<Value, CodecError> {
        self.safe_parse(input).into_result()
    }
}

/// Codecs whose encoding always has the same length
pub trait FixedSizeCodec: Codec {
    /// Encoded length in bytes
    fn byte_length(&self) -> usize;
}

/// Shared handle to a codec, tagged with its size capability
#[derive(Debug, Clone)]
pub enum AnyCodec {
    /// Constant encoded length
    Fixed(Arc<dyn FixedSizeCodec>),
    /// Value-dependent encoded length
    Dynamic(Arc<dyn Codec>),
}

impl AnyCodec {
    /// Wrap a fixed-size codec
    pub fn fixed(codec: impl FixedSizeCodec + 'static) -> Self {
        AnyCodec::Fixed(Arc::new(codec))
    }

    /// Wrap a dynamic-size codec
    pub fn dynamic(codec: impl Codec + 'static) -> Self {
        AnyCodec::Dynamic(Arc::new(codec))
    }

    /// Whether the encoded length is constant
    pub fn is_fixed(&self) -> bool {
        matches!(self, AnyCodec::Fixed(_))
    }

    /// Encoded length of fixed-size codecs
    pub fn byte_length(&self) -> Option<usize> {
        match self {
            AnyCodec::Fixed(codec) => Some(codec.byte_length()),
            AnyCodec::Dynamic(_) => None,
        }
    }

    /// The fixed-size view of this codec, if it has one
    pub fn as_fixed(&self) -> Option<&Arc<dyn FixedSizeCodec>> {
        match self {
            AnyCodec::Fixed(codec) => Some(codec),
            AnyCodec::Dynamic(_) => None,
        }
    }

    pub(crate) fn require_fixed(&self) -> Result<Arc<dyn FixedSizeCodec>, ShapeError> {
        self.as_fixed()
            .cloned()
            .ok_or_else(|| ShapeError::NotFixedSize(self.name().to_string()))
    }

    /// Whether both handles point at the same codec instance
    pub fn ptr_eq(&self, other: &AnyCodec) -> bool {
        match (self, other) {
            (AnyCodec::Fixed(a), AnyCodec::Fixed(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (AnyCodec::Dynamic(a), AnyCodec::Dynamic(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl From<&AnyCodec> for AnyCodec {
    fn from(codec: &AnyCodec) -> Self {
        codec.clone()
    }
}

impl Codec for AnyCodec {
    fn name(&self) -> &str {
        match self {
            AnyCodec::Fixed(c) => c.name(),
            AnyCodec::Dynamic(c) => c.name(),
        }
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        match self {
            AnyCodec::Fixed(c) => c.pack_to(value, writer),
            AnyCodec::Dynamic(c) => c.pack_to(value, writer),
        }
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        match self {
            AnyCodec::Fixed(c) => c.unpack_with(bytes, strict),
            AnyCodec::Dynamic(c) => c.unpack_with(bytes, strict),
        }
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        match self {
            AnyCodec::Fixed(c) => c.safe_parse(input),
            AnyCodec::Dynamic(c) => c.safe_parse(input),
        }
    }

    fn schema(&self) -> String {
        match self {
            AnyCodec::Fixed(c) => c.schema(),
            AnyCodec::Dynamic(c) => c.schema(),
        }
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        match self {
            AnyCodec::Fixed(c) => c.dependencies(),
            AnyCodec::Dynamic(c) => c.dependencies(),
        }
    }
}

/// Implement `From<$ty> for AnyCodec` with the right capability tag
macro_rules! impl_into_any_codec {
    (fixed $ty:ty) => {
        impl From<$ty> for $crate::codec::AnyCodec {
            fn from(codec: $ty) -> Self {
                $crate::codec::AnyCodec::fixed(codec)
            }
        }
    };
    (dynamic $ty:ty) => {
        impl From<$ty> for $crate::codec::AnyCodec {
            fn from(codec: $ty) -> Self {
                $crate::codec::AnyCodec::dynamic(codec)
            }
        }
    };
}
pub(crate) use impl_into_any_codec;

/// Render an untyped input for error messages
pub(crate) fn describe(input: &Json) -> String {
    input.to_string()
}

/// Fail unless `bytes` is exactly `expected` long
pub(crate) fn check_exact_length(bytes: &[u8], expected: usize) -> Result<(), CodecError> {
    if bytes.len() != expected {
        return Err(CodecError::expected_length(expected, bytes.len()));
    }
    Ok(())
}

/// Convert a length into a u32 header
pub(crate) fn header_u32(len: usize) -> Result<u32, PackError> {
    u32::try_from(len).map_err(|_| PackError::Overflow(len))
}

/// Collect independently parsed members, aggregating every failure under
/// one node carrying `message`
pub(crate) fn collect_members<I, K>(members: I, message: &str) -> Result<Vec<Value>, CodecError>
where
    I: IntoIterator<Item = (K, SafeParseResult<Value>)>,
    K: Into<PathSegment>,
{
    let mut values = Vec::new();
    let mut issue: Option<CodecIssue> = None;

    for (key, result) in members {
        match result.into_result() {
            Ok(value) => values.push(value),
            Err(error) => {
                issue
                    .get_or_insert_with(|| CodecIssue::leaf(message))
                    .add_child(key, error.into_issue());
            }
        }
    }

    match issue {
        Some(issue) => Err(CodecError::from_issue(issue)),
        None => Ok(values),
    }
}

/// Add one layer of index, field or variant context to a child failure
///
/// The child's issue tree is kept under `key` and the child error itself
/// becomes the cause.
pub(crate) fn wrap_error(
    message: String,
    key: impl Into<PathSegment>,
    cause: CodecError,
) -> CodecError {
    let issue = CodecIssue::create(Some(message), [(key, cause.issue().clone())]);
    CodecError::from_issue(issue).with_cause(cause)
}

/// Unpack `count` contiguous fixed-size elements
///
/// The caller has already checked `bytes.len() == count * element.byte_length()`.
pub(crate) fn unpack_fixed_elements(
    element: &dyn FixedSizeCodec,
    bytes: &[u8],
    count: usize,
    strict: bool,
) -> Result<Vec<Value>, CodecError> {
    let size = element.byte_length();
    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * size;
        values.push(element.unpack_with(&bytes[start..start + size], strict)?);
    }
    Ok(values)
}

/// Render a multi-line `struct`/`table`/`union` declaration
pub(crate) fn schema_block<I>(keyword: &str, name: &str, lines: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut out = format!("{} {} {{\n", keyword, name);
    for (key, value) in lines {
        out.push_str(SCHEMA_INDENT);
        out.push_str(&key);
        out.push_str(": ");
        out.push_str(&value);
        out.push_str(",\n");
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::array;
    use crate::byte::byte;
    use crate::option::option;

    #[test]
    fn test_any_codec_capability() {
        let fixed: AnyCodec = byte().into();
        let dynamic: AnyCodec = option("ByteOpt", byte()).into();

        assert!(fixed.is_fixed());
        assert_eq!(fixed.byte_length(), Some(1));
        assert!(!dynamic.is_fixed());
        assert_eq!(dynamic.byte_length(), None);
        assert_eq!(
            dynamic.require_fixed().unwrap_err(),
            ShapeError::NotFixedSize("ByteOpt".into())
        );
    }

    #[test]
    fn test_ptr_eq() {
        let a: AnyCodec = array("Byte2", byte(), 2).unwrap().into();
        let b = a.clone();
        let c: AnyCodec = array("Byte2", byte(), 2).unwrap().into();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_schema_block() {
        let text = schema_block(
            "struct",
            "Point",
            [("x".to_string(), "byte".to_string())],
        );
        assert_eq!(text, "struct Point {\n    x: byte,\n}");
    }
}
