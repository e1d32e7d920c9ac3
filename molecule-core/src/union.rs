//! Tagged alternatives: `union Name { Variant: id, ... }`
//!
//! Layout: u32 little-endian tag id, then the selected variant's bytes,
//! which run to the end of the buffer.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value as Json;

use crate::codec::{describe, impl_into_any_codec, schema_block, wrap_error, AnyCodec, Codec};
use crate::constants::{read_u32, NUMBER_SIZE};
use crate::error::{CodecError, CodecIssue, PackError, SafeParseResult, ShapeError};
use crate::shape::order_members;
use crate::value::Value;
use crate::writer::BinaryWriter;

/// A union over named variants
#[derive(Debug, Clone)]
pub struct UnionCodec {
    name: String,
    variants: Vec<(String, AnyCodec)>,
    tag_name_by_id: BTreeMap<u32, String>,
    tag_id_by_name: HashMap<String, u32>,
}

/// Create a union whose tag ids follow `keys`: 0, 1, 2, ...
///
/// Every variant codec must be named after its key.
pub fn union<I, K, C, S>(name: impl Into<String>, variants: I, keys: &[S]) -> Result<UnionCodec, ShapeError>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<AnyCodec>,
    S: AsRef<str>,
{
    let tags = keys
        .iter()
        .zip(0u32..)
        .map(|(key, id)| (key.as_ref().to_string(), id))
        .collect();
    build(name.into(), variants, tags)
}

/// Create a union with explicit, possibly sparse, tag ids
pub fn union_with_tags<I, K, C, S>(
    name: impl Into<String>,
    variants: I,
    tags: &[(S, u32)],
) -> Result<UnionCodec, ShapeError>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<AnyCodec>,
    S: AsRef<str>,
{
    let tags = tags
        .iter()
        .map(|(key, id)| (key.as_ref().to_string(), *id))
        .collect();
    build(name.into(), variants, tags)
}

fn build<I, K, C>(name: String, variants: I, tags: Vec<(String, u32)>) -> Result<UnionCodec, ShapeError>
where
    I: IntoIterator<Item = (K, C)>,
    K: Into<String>,
    C: Into<AnyCodec>,
{
    let keys: Vec<&str> = tags.iter().map(|(key, _)| key.as_str()).collect();
    let variants = order_members(variants, &keys)?;

    for (key, codec) in &variants {
        if codec.name() != key {
            return Err(ShapeError::NameMismatch {
                codec: codec.name().to_string(),
                tag: key.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    let mut tag_name_by_id = BTreeMap::new();
    let mut tag_id_by_name = HashMap::new();
    for (key, id) in &tags {
        if !seen.insert(*id) {
            return Err(ShapeError::DuplicateTagId(*id));
        }
        tag_name_by_id.insert(*id, key.clone());
        tag_id_by_name.insert(key.clone(), *id);
    }

    Ok(UnionCodec {
        name,
        variants,
        tag_name_by_id,
        tag_id_by_name,
    })
}

impl UnionCodec {
    /// Variant names keyed by tag id, in ascending id order
    pub fn tag_name_by_id(&self) -> &BTreeMap<u32, String> {
        &self.tag_name_by_id
    }

    /// Tag ids keyed by variant name
    pub fn tag_id_by_name(&self) -> &HashMap<String, u32> {
        &self.tag_id_by_name
    }

    /// Codec of a variant
    pub fn variant(&self, name: &str) -> Option<&AnyCodec> {
        self.variants
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, codec)| codec)
    }

    fn variant_parse_failed(error: CodecError) -> CodecError {
        CodecError::from_issue(CodecIssue::create(
            Some("Union variant parse failed".to_string()),
            [("value", error.into_issue())],
        ))
    }
}

impl Codec for UnionCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        let union = value.as_union().ok_or(PackError::TypeMismatch {
            expected: "union",
            found: value.kind(),
        })?;
        let (id, codec) = self
            .tag_id_by_name
            .get(&union.variant)
            .zip(self.variant(&union.variant))
            .ok_or_else(|| PackError::UnknownVariant(union.variant.clone()))?;
        writer.write_u32(*id);
        codec.pack_to(&union.value, writer)
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        if bytes.len() < NUMBER_SIZE {
            return Err(CodecError::expected_min_length(NUMBER_SIZE, bytes.len()));
        }
        let id = read_u32(bytes, 0);
        let Some((name, codec)) = self
            .tag_name_by_id
            .get(&id)
            .and_then(|name| self.variant(name).map(|codec| (name, codec)))
        else {
            let ids = self
                .tag_name_by_id
                .keys()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            return Err(CodecError::new(format!(
                "Expected tag ids {}, found {}",
                ids, id
            )));
        };

        let value = codec
            .unpack_with(&bytes[NUMBER_SIZE..], strict)
            .map_err(|e| wrap_error(format!("Invalid union variable {}", name), name.as_str(), e))?;
        Ok(Value::union(name.clone(), value))
    }

    fn safe_parse(&self, input: &Json) -> SafeParseResult<Value> {
        let Some(object) = input.as_object() else {
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected object, found {}",
                describe(input)
            )));
        };

        let tag = object.get("type").unwrap_or(&Json::Null);
        let Some((name, codec)) = tag.as_str().and_then(|name| self.variant(name).map(|c| (name, c))) else {
            let found = tag.as_str().map_or_else(|| describe(tag), String::from);
            return SafeParseResult::Failure(CodecError::new(format!(
                "Expected a valid union type, found {}",
                found
            )));
        };

        match codec.safe_parse(object.get("value").unwrap_or(&Json::Null)) {
            SafeParseResult::Success(value) => SafeParseResult::Success(Value::union(name, value)),
            SafeParseResult::Failure(error) => SafeParseResult::Failure(Self::variant_parse_failed(error)),
        }
    }

    fn schema(&self) -> String {
        schema_block(
            "union",
            &self.name,
            self.tag_name_by_id
                .iter()
                .map(|(id, name)| (name.clone(), id.to_string())),
        )
    }

    fn dependencies(&self) -> Vec<AnyCodec> {
        self.tag_name_by_id
            .values()
            .filter_map(|name| self.variant(name).cloned())
            .collect()
    }
}

impl_into_any_codec!(dynamic UnionCodec);
