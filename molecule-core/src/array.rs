//! Fixed-length homogeneous arrays: `array` and the raw-byte `byte_array`

use alloc::sync::Arc;

use bytes::Bytes;
use serde_json::Value as Json;

use crate::codec::{
    check_exact_length, collect_members, describe, impl_into_any_codec, unpack_fixed_elements,
    AnyCodec, Codec, FixedSizeCodec,
};
use crate::constants::BYTE_NAME;
use crate::error::{CodecError, PackError, SafeParseResult, ShapeError};
use crate::hex_string;
use crate::value::Value;
use crate::writer::BinaryWriter;

/// `array Name [Element; N];`
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    name: String,
    element: Arc<dyn FixedSizeCodec>,
    length: usize,
    byte_length: usize,
}

/// Create an array of `length` fixed-size elements
pub fn array(
    name: impl Into<String>,
    element: impl Into<AnyCodec>,
    length: usize,
) -> Result<ArrayCodec, ShapeError> {
    let name = name.into();
    let element = element.into().require_fixed()?;
    let byte_length = length
        .checked_mul(element.byte_length())
        .ok_or_else(|| ShapeError::TooLarge(name.clone()))?;

    Ok(ArrayCodec {
        name,
        element,
        length,
        byte_length,
    })
}

impl ArrayCodec {
    /// Number of elements
    pub fn length(&self) -> usize {
        self.length
    }

    /// Element codec
    pub fn element(&self) -> AnyCodec {
        AnyCodec::Fixed(self.element.clone())
    }
}

impl Codec for ArrayCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        let items = value.as_list().ok_or(PackError::TypeMismatch {
            expected: "list",
            found: value.kind(),
        })?;
        if items.len() != self.length {
            return Err(PackError::LengthMismatch {
                expected: self.length,
                found: items.len(),
            });
        }
        for item in items {
            self.element.pack_to(item, writer)?;
        }
        Ok(())
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        check_exact_length(bytes, self.byte_length())?;
        unpack_fixed_elements(self.element.as_ref(), bytes, self.length, strict).map(Value::List)
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        let Some(items) = input.as_array() else {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected array of length {}, found {}",
                self.length,
                describe(input)
            )));
        };
        if items.len() != self.length {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected array length {}, found {}",
                self.length,
                items.len()
            )));
        }

        collect_members(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| (i, self.element.safe_parse(item))),
            "Array member parse failed",
        )
        .map(Value::List)
        .into()
    }

    fn schema(&self) -> String {
        format!(
            "array {} [{}; {}];",
            self.name,
            self.element.name(),
            self.length
        )
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        vec![self.element()]
    }
}

impl FixedSizeCodec for ArrayCodec {
    fn byte_length(&self) -> usize {
        self.byte_length
    }
}

impl_into_any_codec!(fixed ArrayCodec);

/// `array Name [byte; N];` with raw bytes as its canonical value
#[derive(Debug, Clone)]
pub struct ByteArrayCodec {
    name: String,
    length: usize,
}

/// Create a byte array of `length` bytes
pub fn byte_array(name: impl Into<String>, length: usize) -> ByteArrayCodec {
    ByteArrayCodec {
        name: name.into(),
        length,
    }
}

impl ByteArrayCodec {
    /// Number of bytes
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Codec for ByteArrayCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        let bytes = value.as_bytes().ok_or(PackError::TypeMismatch {
            expected: "bytes",
            found: value.kind(),
        })?;
        if bytes.len() != self.length {
            return Err(PackError::LengthMismatch {
                expected: self.length,
                found: bytes.len(),
            });
        }
        writer.write_bytes(bytes);
        Ok(())
    }

    fn unpack_with(&self, bytes: &[u8], _strict: bool) -> Result<Value, CodecError> {
        check_exact_length(bytes, self.length)?;
        Ok(Value::Bytes(Bytes::copy_from_slice(bytes)))
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        let decoded = input.as_str().and_then(|s| hex_string::decode(s).ok());
        let Some(bytes) = decoded else {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected bytes of length {}, found {}",
                self.length,
                describe(input)
            )));
        };
        if bytes.len() != self.length {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected array length {}, found {}",
                self.length,
                bytes.len()
            )));
        }
        SafeParseResult::Success(Value::Bytes(Bytes::from(bytes)))
    }

    fn schema(&self) -> String {
        format!("array {} [{}; {}];", self.name, BYTE_NAME, self.length)
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        vec![AnyCodec::fixed(crate::byte::byte())]
    }
}

impl FixedSizeCodec for ByteArrayCodec {
    fn byte_length(&self) -> usize {
        self.length
    }
}

impl_into_any_codec!(fixed ByteArrayCodec);
