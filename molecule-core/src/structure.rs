//! Fixed-size records: `struct Name { field: Type, ... }`

use alloc::sync::Arc;

use serde_json::Value as Json;

use crate::codec::{
    check_exact_length, collect_members, describe, impl_into_any_codec, schema_block, AnyCodec,
    Codec, FixedSizeCodec,
};
use crate::error::{CodecError, PackError, SafeParseResult, ShapeError};
use crate::shape::order_members;
use crate::value::Value;
use crate::writer::BinaryWriter;

/// Fixed-size fields laid out back to back in declared order
#[derive(Debug, Clone)]
pub struct StructCodec {
    name: String,
    fields: Vec<(String, Arc<dyn FixedSizeCodec>)>,
    byte_length: usize,
}

/// Create a struct
///
/// `keys` fixes the field order and must name every field exactly once.
/// Every field must be fixed size.
pub fn structure<I, K, C, S>(
    name: impl Into<String>,
    fields: I,
    keys: &[S],
) -> Result<StructCodec, ShapeError>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<AnyCodec>,
    S: AsRef<str>,
{
    let fields = order_members(fields, keys)?
        .into_iter()
        .map(|(key, codec)| Ok((key, codec.require_fixed()?)))
        .collect::<Result<Vec<_>, ShapeError>>()?;
    let name = name.into();
    let byte_length = fields
        .iter()
        .try_fold(0usize, |total, (_, codec)| total.checked_add(codec.byte_length()))
        .ok_or_else(|| ShapeError::TooLarge(name.clone()))?;

    Ok(StructCodec {
        name,
        fields,
        byte_length,
    })
}

impl StructCodec {
    /// Field names in declared order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }
}

impl Codec for StructCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        if value.as_object().is_none() {
            return Err(PackError::TypeMismatch {
                expected: "object",
                found: value.kind(),
            });
        }
        for (key, codec) in &self.fields {
            codec.pack_to(value.get(key).unwrap_or(&Value::Null), writer)?;
        }
        Ok(())
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        check_exact_length(bytes, self.byte_length)?;

        let mut offset = 0;
        let mut fields = Vec::with_capacity(self.fields.len());
        for (key, codec) in &self.fields {
            let end = offset + codec.byte_length();
            fields.push((key.clone(), codec.unpack_with(&bytes[offset..end], strict)?));
            offset = end;
        }
        Ok(Value::Object(fields))
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        let Some(object) = input.as_object() else {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected object, found {}",
                describe(input)
            )));
        };

        let parsed = collect_members(
            self.fields.iter().map(|(key, codec)| {
                let field = object.get(key).unwrap_or(&Json::Null);
                (key.as_str(), codec.safe_parse(field))
            }),
            "Struct member parse failed",
        );
        parsed
            .map(|values| Value::Object(self.keys().map(String::from).zip(values).collect()))
            .into()
    }

    fn schema(&self) -> String {
        schema_block(
            "struct",
            &self.name,
            self.fields
                .iter()
                .map(|(key, codec)| (key.clone(), codec.name().to_string())),
        )
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        self.fields
            .iter()
            .map(|(_, codec)| AnyCodec::Fixed(codec.clone()))
            .collect()
    }
}

impl FixedSizeCodec for StructCodec {
    fn byte_length(&self) -> usize {
        self.byte_length
    }
}

impl_into_any_codec!(fixed StructCodec);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{array, byte_array};
    use crate::byte::byte;
    use crate::option::option;
    use serde_json::json;

    fn byte4n2() -> StructCodec {
        structure(
            "Byte4n2",
            [
                ("b4", AnyCodec::from(array("Byte4", byte(), 4).unwrap())),
                ("b2", AnyCodec::from(array("Byte2", byte(), 2).unwrap())),
            ],
            &["b4", "b2"],
        )
        .unwrap()
    }

    #[test]
    fn test_schema() {
        let codec = byte4n2();
        assert_eq!(codec.byte_length(), 6);
        assert_eq!(codec.schema(), "struct Byte4n2 {\n    b4: Byte4,\n    b2: Byte2,\n}");
    }

    #[test]
    fn test_rejects_dynamic_field() {
        let err = structure("S", [("x", option("ByteOpt", byte()))], &["x"]).unwrap_err();
        assert_eq!(err, ShapeError::NotFixedSize("ByteOpt".into()));
    }

    #[test]
    fn test_rejects_oversized_fields() {
        let half = || byte_array("Half", usize::MAX / 2 + 1);
        let err = structure("Big", [("a", half()), ("b", half())], &["a", "b"]).unwrap_err();
        assert_eq!(err, ShapeError::TooLarge("Big".into()));
    }

    #[test]
    fn test_shape_errors() {
        let build = |keys: &[&str]| structure("P", [("x", byte()), ("y", byte())], keys);
        assert_eq!(
            build(&["x"]).unwrap_err().to_string(),
            "Missing keys found: y"
        );
        assert_eq!(
            build(&["x", "x", "y"]).unwrap_err().to_string(),
            "Duplicate key found: x"
        );
        assert_eq!(
            build(&["x", "y", "z"]).unwrap_err().to_string(),
            "Unknown key found: z"
        );
    }

    #[test]
    fn test_pack_follows_declared_order() {
        let value = Value::object([
            ("b2", Value::list([2u8, 2])),
            ("b4", Value::list([4u8, 4, 4, 4])),
        ]);
        assert_eq!(
            byte4n2().pack(&value).unwrap().as_ref(),
            &[4, 4, 4, 4, 2, 2]
        );
    }

    #[test]
    fn test_unpack() {
        assert_eq!(
            byte4n2().unpack(&[4, 4, 4, 4, 2, 2]).unwrap(),
            Value::object([
                ("b4", Value::list([4u8, 4, 4, 4])),
                ("b2", Value::list([2u8, 2])),
            ])
        );
        for input in [&[][..], &[1, 2, 3, 4, 5][..], &[1, 2, 3, 4, 5, 6, 7][..]] {
            assert_eq!(
                byte4n2().unpack(input).unwrap_err().to_string(),
                format!("Expected bytes length 6, found {}", input.len())
            );
        }
    }

    #[test]
    fn test_safe_parse() {
        let parsed = byte4n2()
            .parse(&json!({"b2": [2, 2], "b4": [4, 4, 4, 4], "extra": 1}))
            .unwrap();
        assert_eq!(
            parsed.as_object().unwrap().iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["b4", "b2"]
        );

        assert_eq!(
            byte4n2().parse(&json!([1])).unwrap_err().to_string(),
            "Expected object, found [1]"
        );

        let err = byte4n2().parse(&json!({"b4": [4, 4, 4, 4]})).unwrap_err();
        assert_eq!(err.to_string(), "Struct member parse failed");
        assert_eq!(
            err.collect_messages(),
            vec![
                "//: Struct member parse failed",
                "//b2: Expected array of length 2, found null",
            ]
        );
    }
}
