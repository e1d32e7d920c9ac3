//! Extensible records: `table Name { field: Type, ... }`
//!
//! Tables share the dynvec header layout, one offset per field. Decoding
//! tolerates schema evolution: data written with fewer trailing fields is
//! completed from empty buffers, and data written with more trailing fields
//! is truncated. Strict mode turns both tolerances into errors.

use serde_json::Value as Json;

use crate::codec::{
    collect_members, describe, impl_into_any_codec, schema_block, wrap_error, AnyCodec, Codec,
};
use crate::dynvec::{pack_offsets, unpack_offsets};
use crate::error::{CodecError, PackError, SafeParseResult, ShapeError};
use crate::shape::order_members;
use crate::value::Value;
use crate::writer::BinaryWriter;

#[cfg(feature = "logging")]
use tracing::debug;

/// Named fields of any size, addressed through an offset header
#[derive(Debug, Clone)]
pub struct TableCodec {
    name: String,
    fields: Vec<(String, AnyCodec)>,
}

/// Create a table
///
/// `keys` fixes the field order and must name every field exactly once.
pub fn table<I, K, C, S>(name: impl Into<String>, fields: I, keys: &[S]) -> Result<TableCodec, ShapeError>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<AnyCodec>,
    S: AsRef<str>,
{
    Ok(TableCodec {
        name: name.into(),
        fields: order_members(fields, keys)?,
    })
}

impl TableCodec {
    /// Field names in declared order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Codec of a declared field
    pub fn field(&self, key: &str) -> Option<&AnyCodec> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, codec)| codec)
    }
}

impl Codec for TableCodec {
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
        let packed = self
            .fields
            .iter()
            .map(|(key, codec)| codec.pack(value.get(key).unwrap_or(&Value::Null)))
            .collect::<Result<Vec<_>, _>>()?;
        pack_offsets(&packed, writer)
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        let ranges = unpack_offsets(bytes, "table")?;
        let declared = self.fields.len();

        if ranges.len() < declared {
            let missing = declared - ranges.len();
            if strict {
                #[cfg(feature = "logging")]
                debug!("Rejecting {}: {} missing fields in strict mode", self.name, missing);
                return Err(CodecError::new(format!(
                    "Table strict mode is on, found {} missing fields",
                    missing
                )));
            }
            #[cfg(feature = "logging")]
            debug!("Completing {} with {} absent trailing fields", self.name, missing);
        } else if ranges.len() > declared {
            let extra = ranges.len() - declared;
            let dropped = bytes.len() - ranges[declared].start;
            if strict {
                #[cfg(feature = "logging")]
                debug!(
                    "Rejecting {}: {} extra fields ({} bytes) in strict mode",
                    self.name, extra, dropped
                );
                return Err(CodecError::new(format!(
                    "Table strict mode is on, found {} extra fields and {} bytes",
                    extra, dropped
                )));
            }
            #[cfg(feature = "logging")]
            debug!(
                "Dropping {} extra fields ({} bytes) of {}",
                extra, dropped, self.name
            );
        }

        let mut fields = Vec::with_capacity(declared);
        for (i, (key, codec)) in self.fields.iter().enumerate() {
            let value = match ranges.get(i) {
                Some(range) => codec
                    .unpack_with(&bytes[range.clone()], strict)
                    .map_err(|e| wrap_error(format!("Invalid table field {}", key), key.as_str(), e))?,
                None => codec.unpack_with(&[], strict)?,
            };
            fields.push((key.clone(), value));
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

        collect_members(
            self.fields.iter().map(|(key, codec)| {
                let field = object.get(key).unwrap_or(&Json::Null);
                (key.as_str(), codec.safe_parse(field))
            }),
            "Table member parse failed",
        )
        .map(|values| Value::Object(self.keys().map(String::from).zip(values).collect()))
        .into()
    }

    fn schema(&self) -> String {
        schema_block(
            "table",
            &self.name,
            self.fields
                .iter()
                .map(|(key, codec)| (key.clone(), codec.name().to_string())),
        )
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        self.fields.iter().map(|(_, codec)| codec.clone()).collect()
    }
}

impl_into_any_codec!(dynamic TableCodec);
