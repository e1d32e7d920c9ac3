//! `option`: a value that may be absent

use serde_json::Value as Json;

use crate::codec::{impl_into_any_codec, AnyCodec, Codec};
use crate::error::{CodecError, PackError, SafeParseResult};
use crate::value::Value;
use crate::writer::BinaryWriter;

/// `option Name (Inner);`
///
/// Absent values take zero bytes; present values are encoded exactly as the
/// inner codec encodes them.
#[derive(Debug, Clone)]
pub struct OptionCodec {
    name: String,
    inner: AnyCodec,
}

/// Create an option over `inner`
pub fn option(name: impl Into<String>, inner: impl Into<AnyCodec>) -> OptionCodec {
    OptionCodec {
        name: name.into(),
        inner: inner.into(),
    }
}

impl OptionCodec {
    /// Wrapped codec
    pub fn inner(&self) -> &AnyCodec {
        &self.inner
    }
}

impl Codec for OptionCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        match value {
            Value::Null => Ok(()),
            present => self.inner.pack_to(present, writer),
        }
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        self.inner.unpack_with(bytes, strict)
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        if input.is_null() {
            return SafeParseResult::Success(Value::Null);
        }
        self.inner.safe_parse(input)
    }

    fn schema(&self) -> String {
        format!("option {} ({});", self.name, self.inner.name())
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        vec![self.inner.clone()]
    }
}

impl_into_any_codec!(dynamic OptionCodec);
