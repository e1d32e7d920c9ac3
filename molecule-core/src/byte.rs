//! The primitive `byte` codec

use serde_json::Value as Json;

use crate::codec::{check_exact_length, describe, impl_into_any_codec, AnyCodec, Codec, FixedSizeCodec};
use crate::constants::BYTE_NAME;
use crate::error::{CodecError, PackError, SafeParseResult};
use crate::value::Value;
use crate::writer::BinaryWriter;

/// A single unsigned 8-bit integer
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCodec;

/// The `byte` codec
pub fn byte() -> ByteCodec {
    ByteCodec
}

impl Codec for ByteCodec {
    fn name(&self) -> &str {
        BYTE_NAME
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        match value {
            Value::Byte(b) => {
                writer.write_bytes(&[*b]);
                Ok(())
            }
            other => Err(PackError::TypeMismatch {
                expected: "byte",
                found: other.kind(),
            }),
        }
    }

    fn unpack_with(&self, bytes: &[u8], _strict: bool) -> Result<Value, CodecError> {
        check_exact_length(bytes, 1)?;
        Ok(Value::Byte(bytes[0]))
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        let integer = input.as_u64().or_else(|| {
            input
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=255.0).contains(f))
                .map(|f| f as u64)
        });
        match integer.and_then(|n| u8::try_from(n).ok()) {
            Some(b) => SafeParseResult::Success(Value::Byte(b)),
            None => SafeParseResult::Failure(CodecError::new(format!(
                "Expected integer from 0 to 255, found {}",
                describe(input)
            ))),
        }
    }

    fn schema(&self) -> String {
        String::new()
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        Vec::new()
    }
}

impl FixedSizeCodec for ByteCodec {
    fn byte_length(&self) -> usize {
        1
    }
}

impl_into_any_codec!(fixed ByteCodec);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_parse() {
        assert_eq!(byte().safe_parse(&json!(1)), SafeParseResult::Success(Value::Byte(1)));
        assert_eq!(byte().parse(&json!(255)).unwrap(), Value::Byte(255));
        assert_eq!(byte().parse(&json!(1.0)).unwrap(), Value::Byte(1));
        assert_eq!(byte().parse(&json!(255.0)).unwrap(), Value::Byte(255));
        assert_eq!(byte().parse(&json!(0.0)).unwrap(), Value::Byte(0));

        for (input, shown) in [
            (json!(-1), "-1"),
            (json!(1.1), "1.1"),
            (json!(256), "256"),
            (json!(256.0), "256.0"),
            (json!(-1.0), "-1.0"),
            (json!(null), "null"),
            (json!(true), "true"),
            (json!("1"), "\"1\""),
        ] {
            let err = byte().safe_parse(&input).err().unwrap();
            assert_eq!(
                err.to_string(),
                format!("Expected integer from 0 to 255, found {}", shown)
            );
        }
    }

    #[test]
    fn test_unpack() {
        assert_eq!(byte().unpack(&[0]).unwrap(), Value::Byte(0));
        assert_eq!(byte().unpack(&[1]).unwrap(), Value::Byte(1));

        assert_eq!(
            byte().unpack(&[]).unwrap_err().to_string(),
            "Expected bytes length 1, found 0"
        );
        assert_eq!(
            byte().unpack(&[2, 3]).unwrap_err().to_string(),
            "Expected bytes length 1, found 2"
        );
    }

    #[test]
    fn test_pack() {
        assert_eq!(byte().pack(&Value::Byte(0)).unwrap().as_ref(), &[0]);
        assert_eq!(byte().pack(&Value::Byte(255)).unwrap().as_ref(), &[255]);
        assert_eq!(
            byte().pack(&Value::Null).unwrap_err(),
            PackError::TypeMismatch {
                expected: "byte",
                found: "null"
            }
        );
    }

    #[test]
    fn test_byte_length() {
        assert_eq!(byte().byte_length(), 1);
        assert_eq!(byte().name(), "byte");
        assert!(byte().dependencies().is_empty());
    }
}
