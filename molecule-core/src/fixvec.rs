//! Vectors of fixed-size elements: `fixvec` and the raw-byte `byte_fixvec`
//!
//! Layout: u32 little-endian item count, then the items back to back.

use alloc::sync::Arc;

use bytes::Bytes;
use serde_json::Value as Json;

use crate::codec::{
    collect_members, describe, header_u32, impl_into_any_codec, unpack_fixed_elements, AnyCodec,
    Codec, FixedSizeCodec,
};
use crate::constants::{read_u32, BYTE_NAME, NUMBER_SIZE};
use crate::error::{CodecError, PackError, SafeParseResult, ShapeError};
use crate::hex_string;
use crate::value::Value;
use crate::writer::BinaryWriter;

/// `vector Name <Element>;` over a fixed-size element
#[derive(Debug, Clone)]
pub struct FixvecCodec {
    name: String,
    element: Arc<dyn FixedSizeCodec>,
}

/// Create a fixvec over a fixed-size, non-empty element
pub fn fixvec(name: impl Into<String>, element: impl Into<AnyCodec>) -> Result<FixvecCodec, ShapeError> {
    let element = element.into().require_fixed()?;
    if element.byte_length() == 0 {
        return Err(ShapeError::ZeroSized(element.name().to_string()));
    }
    Ok(FixvecCodec {
        name: name.into(),
        element,
    })
}

/// Read the item count and check the total length against it
fn unpack_count(bytes: &[u8], item_size: usize) -> Result<usize, CodecError> {
    if bytes.len() < NUMBER_SIZE {
        return Err(CodecError::expected_min_length(NUMBER_SIZE, bytes.len()));
    }
    let count = read_u32(bytes, 0) as usize;
    let required = NUMBER_SIZE as u128 + count as u128 * item_size as u128;
    if required != bytes.len() as u128 {
        return Err(CodecError::new(format!(
            "Expected bytes length {}, found {}",
            required,
            bytes.len()
        )));
    }
    Ok(count)
}

impl FixvecCodec {
    /// Element codec
    pub fn element(&self) -> AnyCodec {
        AnyCodec::Fixed(self.element.clone())
    }
}

impl Codec for FixvecCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        let items = value.as_list().ok_or(PackError::TypeMismatch {
            expected: "list",
            found: value.kind(),
        })?;
        writer.write_u32(header_u32(items.len())?);
        for item in items {
            self.element.pack_to(item, writer)?;
        }
        Ok(())
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        let count = unpack_count(bytes, self.element.byte_length())?;
        unpack_fixed_elements(self.element.as_ref(), &bytes[NUMBER_SIZE..], count, strict)
            .map(Value::List)
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        let Some(items) = input.as_array() else {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected array, found {}",
                describe(input)
            )));
        };
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
        format!("vector {} <{}>;", self.name, self.element.name())
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        vec![self.element()]
    }
}

impl_into_any_codec!(dynamic FixvecCodec);

/// `vector Name <byte>;` with raw bytes as its canonical value
#[derive(Debug, Clone)]
pub struct ByteFixvecCodec {
    name: String,
}

/// Create a byte vector
pub fn byte_fixvec(name: impl Into<String>) -> ByteFixvecCodec {
    ByteFixvecCodec { name: name.into() }
}

impl Codec for ByteFixvecCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        let bytes = value.as_bytes().ok_or(PackError::TypeMismatch {
            expected: "bytes",
            found: value.kind(),
        })?;
        writer.write_u32(header_u32(bytes.len())?);
        writer.write_bytes(bytes);
        Ok(())
    }

    fn unpack_with(&self, bytes: &[u8], _strict: bool) -> Result<Value, CodecError> {
        let count = unpack_count(bytes, 1)?;
        Ok(Value::Bytes(Bytes::copy_from_slice(
            &bytes[NUMBER_SIZE..NUMBER_SIZE + count],
        )))
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        match input.as_str().and_then(|s| hex_string::decode(s).ok()) {
            Some(bytes) => SafeParseResult::Success(Value::Bytes(Bytes::from(bytes))),
            None => SafeParseResult::Failure(CodecError::new(format!(
                "Expected bytes, found {}",
                describe(input)
            ))),
        }
    }

    fn schema(&self) -> String {
        format!("vector {} <{}>;", self.name, BYTE_NAME)
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        vec![AnyCodec::fixed(crate::byte::byte())]
    }
}

impl_into_any_codec!(dynamic ByteFixvecCodec);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::byte_array;
    use crate::byte::byte;
    use serde_json::json;

    fn bytes_vec() -> FixvecCodec {
        fixvec("Bytes", byte()).unwrap()
    }

    #[test]
    fn test_schema() {
        assert_eq!(bytes_vec().schema(), "vector Bytes <byte>;");
        assert_eq!(byte_fixvec("Bytes").schema(), "vector Bytes <byte>;");
    }

    #[test]
    fn test_rejects_zero_sized_element() {
        let err = fixvec("Empties", byte_array("Empty", 0)).unwrap_err();
        assert_eq!(err, ShapeError::ZeroSized("Empty".into()));
    }

    #[test]
    fn test_safe_parse() {
        assert_eq!(bytes_vec().parse(&json!([])).unwrap(), Value::List(vec![]));
        assert_eq!(
            bytes_vec().parse(&json!([1, 2])).unwrap(),
            Value::list([1u8, 2])
        );
        assert_eq!(
            bytes_vec().parse(&json!([-1, 2])).unwrap_err().to_string(),
            "Array member parse failed"
        );
        assert_eq!(
            bytes_vec().parse(&json!("12")).unwrap_err().to_string(),
            "Expected array, found \"12\""
        );
    }

    #[test]
    fn test_unpack() {
        assert_eq!(bytes_vec().unpack(&[0, 0, 0, 0]).unwrap(), Value::List(vec![]));
        assert_eq!(
            bytes_vec().unpack(&[2, 0, 0, 0, 1, 2]).unwrap(),
            Value::list([1u8, 2])
        );

        for input in [&[][..], &[1, 2, 3][..]] {
            assert_eq!(
                bytes_vec().unpack(input).unwrap_err().to_string(),
                format!("Expected bytes length at least 4, found {}", input.len())
            );
        }

        for (input, required) in [
            (&[0, 0, 0, 0, 0][..], 4),
            (&[1, 0, 0, 0][..], 5),
            (&[2, 0, 0, 0, 0][..], 6),
        ] {
            assert_eq!(
                bytes_vec().unpack(input).unwrap_err().to_string(),
                format!("Expected bytes length {}, found {}", required, input.len())
            );
        }
    }

    #[test]
    fn test_unpack_huge_count_is_rejected() {
        let err = bytes_vec().unpack(&[0xff, 0xff, 0xff, 0xff, 1]).unwrap_err();
        assert_eq!(err.to_string(), "Expected bytes length 4294967299, found 5");
    }

    #[test]
    fn test_pack() {
        assert_eq!(
            bytes_vec().pack(&Value::List(vec![])).unwrap().as_ref(),
            &[0, 0, 0, 0]
        );
        assert_eq!(
            bytes_vec().pack(&Value::list([0u8, 1])).unwrap().as_ref(),
            &[2, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_byte_fixvec() {
        let codec = byte_fixvec("Bytes");

        assert_eq!(codec.parse(&json!("0x")).unwrap(), Value::bytes(&[]));
        assert_eq!(codec.parse(&json!("0x0102")).unwrap(), Value::bytes(&[1, 2]));
        assert_eq!(
            codec.parse(&json!("12")).unwrap_err().to_string(),
            "Expected bytes, found \"12\""
        );
        assert_eq!(
            codec.parse(&json!([1, 2])).unwrap_err().to_string(),
            "Expected bytes, found [1,2]"
        );

        assert_eq!(codec.unpack(&[0, 0, 0, 0]).unwrap(), Value::bytes(&[]));
        assert_eq!(
            codec.unpack(&[2, 0, 0, 0, 1, 2]).unwrap(),
            Value::bytes(&[1, 2])
        );
        assert_eq!(
            codec.unpack(&[1, 2, 3]).unwrap_err().to_string(),
            "Expected bytes length at least 4, found 3"
        );
        assert_eq!(
            codec.unpack(&[2, 0, 0, 0, 0]).unwrap_err().to_string(),
            "Expected bytes length 6, found 5"
        );

        assert_eq!(
            codec.pack(&Value::bytes(&[0, 1])).unwrap().as_ref(),
            &[2, 0, 0, 0, 0, 1]
        );
        assert_eq!(
            codec.pack(&Value::bytes(&[])).unwrap().as_ref(),
            &[0, 0, 0, 0]
        );
    }
}
