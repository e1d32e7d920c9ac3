//! Vectors of variable-size elements
//!
//! Layout: u32 total byte length, one u32 offset per item (absolute from the
//! start of the buffer), then the item payloads in order. Tables share the
//! same header, so the header codec lives here.

use core::ops::Range;

use bytes::Bytes;
use serde_json::Value as Json;

use crate::codec::{collect_members, describe, header_u32, impl_into_any_codec, wrap_error, AnyCodec, Codec};
use crate::constants::{read_u32, MIN_NON_EMPTY_DYNAMIC_SIZE, NUMBER_SIZE};
use crate::error::{CodecError, PackError, SafeParseResult};
use crate::value::Value;
use crate::writer::BinaryWriter;

fn invalid_header(kind: &str, parsed: &[usize]) -> CodecError {
    let parsed = parsed
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",");
    CodecError::new(format!("Invalid {} header parsed so far: {}", kind, parsed))
}

/// Decode the length/offset header and return the byte range of every item
///
/// Every offset is checked against the declared total length, which in turn
/// must equal the buffer length, before it is used as a slice bound. `kind`
/// names the construct in error messages.
pub(crate) fn unpack_offsets(bytes: &[u8], kind: &str) -> Result<Vec<Range<usize>>, CodecError> {
    if bytes.len() < NUMBER_SIZE {
        return Err(CodecError::expected_min_length(NUMBER_SIZE, bytes.len()));
    }
    let total = read_u32(bytes, 0) as usize;
    if total != bytes.len() {
        return Err(CodecError::expected_length(total, bytes.len()));
    }
    if total == NUMBER_SIZE {
        return Ok(Vec::new());
    }
    if total < MIN_NON_EMPTY_DYNAMIC_SIZE {
        return Err(CodecError::new(format!(
            "Invalid {} bytes length: {}",
            kind, total
        )));
    }

    // The first offset is also the header size, which fixes the item count.
    let first = read_u32(bytes, NUMBER_SIZE) as usize;
    let mut parsed = vec![total, first];
    if first % NUMBER_SIZE != 0 || first < MIN_NON_EMPTY_DYNAMIC_SIZE || first > total {
        return Err(invalid_header(kind, &parsed));
    }

    let count = first / NUMBER_SIZE - 1;
    for i in 1..count {
        let offset = read_u32(bytes, NUMBER_SIZE * (i + 1)) as usize;
        let previous = parsed[parsed.len() - 1];
        parsed.push(offset);
        if offset < previous || offset > total {
            return Err(invalid_header(kind, &parsed));
        }
    }

    let offsets = &parsed[1..];
    let ranges = offsets
        .iter()
        .enumerate()
        .map(|(i, &start)| start..offsets.get(i + 1).copied().unwrap_or(total))
        .collect();
    Ok(ranges)
}

/// Write the length/offset header followed by the packed items
pub(crate) fn pack_offsets(items: &[Bytes], writer: &mut BinaryWriter) -> Result<(), PackError> {
    let header_size = NUMBER_SIZE * (items.len() + 1);
    let total = header_size + items.iter().map(Bytes::len).sum::<usize>();

    writer.write_u32(header_u32(total)?);
    let mut offset = header_size;
    for item in items {
        writer.write_u32(header_u32(offset)?);
        offset += item.len();
    }
    for item in items {
        writer.write_bytes(item);
    }
    Ok(())
}

/// `vector Name <Element>;` over a variable-size element
#[derive(Debug, Clone)]
pub struct DynvecCodec {
    name: String,
    element: AnyCodec,
}

/// Create a dynvec; any element codec is accepted
pub fn dynvec(name: impl Into<String>, element: impl Into<AnyCodec>) -> DynvecCodec {
    DynvecCodec {
        name: name.into(),
        element: element.into(),
    }
}

impl DynvecCodec {
    /// Element codec
    pub fn element(&self) -> &AnyCodec {
        &self.element
    }
}

impl Codec for DynvecCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn pack_to(&self, value: &Value, writer: &mut BinaryWriter) -> Result<(), PackError> {
        let items = value.as_list().ok_or(PackError::TypeMismatch {
            expected: "list",
            found: value.kind(),
        })?;
        let packed = items
            .iter()
            .map(|item| self.element.pack(item))
            .collect::<Result<Vec<_>, _>>()?;
        pack_offsets(&packed, writer)
    }

    fn unpack_with(&self, bytes: &[u8], strict: bool) -> Result<Value, CodecError> {
        let ranges = unpack_offsets(bytes, "dynvec")?;
        let mut items = Vec::with_capacity(ranges.len());
        for (i, range) in ranges.into_iter().enumerate() {
            let item = self
                .element
                .unpack_with(&bytes[range], strict)
                .map_err(|e| wrap_error(format!("Invalid dynvec item at index {}", i), i, e))?;
            items.push(item);
        }
        Ok(Value::List(items))
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
        vec![self.element.clone()]
    }
}

impl_into_any_codec!(dynamic DynvecCodec);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte::byte;
    use crate::option::option;
    use serde_json::json;

    fn byte_opt_vec() -> DynvecCodec {
        dynvec("ByteOptVec", option("ByteOpt", byte()))
    }

    #[test]
    fn test_schema() {
        assert_eq!(byte_opt_vec().schema(), "vector ByteOptVec <ByteOpt>;");
    }

    #[test]
    fn test_safe_parse() {
        assert_eq!(byte_opt_vec().parse(&json!([])).unwrap(), Value::List(vec![]));
        assert_eq!(
            byte_opt_vec().parse(&json!([1, 2])).unwrap(),
            Value::list([1u8, 2])
        );
        assert_eq!(
            byte_opt_vec().parse(&json!([null])).unwrap(),
            Value::list([Value::Null])
        );
        assert_eq!(
            byte_opt_vec().parse(&json!([-1, 2])).unwrap_err().to_string(),
            "Array member parse failed"
        );
        assert_eq!(
            byte_opt_vec().parse(&json!("12")).unwrap_err().to_string(),
            "Expected array, found \"12\""
        );
    }

    fn vectors() -> Vec<(Value, Vec<u8>)> {
        vec![
            (Value::List(vec![]), vec![4, 0, 0, 0]),
            (Value::list([Value::Null]), vec![8, 0, 0, 0, 8, 0, 0, 0]),
            (Value::list([1u8]), vec![9, 0, 0, 0, 8, 0, 0, 0, 1]),
            (
                Value::list([Value::Null, Value::Byte(1)]),
                vec![13, 0, 0, 0, 12, 0, 0, 0, 12, 0, 0, 0, 1],
            ),
            (
                Value::list([Value::Byte(1), Value::Null]),
                vec![13, 0, 0, 0, 12, 0, 0, 0, 13, 0, 0, 0, 1],
            ),
        ]
    }

    #[test]
    fn test_pack() {
        for (value, expected) in vectors() {
            assert_eq!(byte_opt_vec().pack(&value).unwrap().as_ref(), &expected[..]);
        }
    }

    #[test]
    fn test_unpack() {
        for (expected, input) in vectors() {
            assert_eq!(byte_opt_vec().unpack(&input).unwrap(), expected);
        }
    }

    #[test]
    fn test_unpack_length_errors() {
        for input in [&[][..], &[1, 2, 3][..]] {
            assert_eq!(
                byte_opt_vec().unpack(input).unwrap_err().to_string(),
                format!("Expected bytes length at least 4, found {}", input.len())
            );
        }

        for (input, total) in [(&[5, 0, 0, 0, 0][..], 5), (&[7, 0, 0, 0, 0, 0, 0][..], 7)] {
            assert_eq!(
                byte_opt_vec().unpack(input).unwrap_err().to_string(),
                format!("Invalid dynvec bytes length: {}", total)
            );
        }

        for (input, total) in [(&[5, 0, 0, 0][..], 5), (&[3, 0, 0, 0][..], 3)] {
            assert_eq!(
                byte_opt_vec().unpack(input).unwrap_err().to_string(),
                format!("Expected bytes length {}, found {}", total, input.len())
            );
        }
    }

    #[test]
    fn test_unpack_header_errors() {
        for (input, parsed) in [
            (&[8, 0, 0, 0, 0, 0, 0, 0][..], "8,0"),
            (&[8, 0, 0, 0, 4, 0, 0, 0][..], "8,4"),
            (&[8, 0, 0, 0, 9, 0, 0, 0][..], "8,9"),
            (&[12, 0, 0, 0, 12, 0, 0, 0, 8, 0, 0, 0][..], "12,12,8"),
        ] {
            assert_eq!(
                byte_opt_vec().unpack(input).unwrap_err().to_string(),
                format!("Invalid dynvec header parsed so far: {}", parsed)
            );
        }
    }

    #[test]
    fn test_unpack_item_error_has_cause() {
        let err = byte_opt_vec()
            .unpack(&[11, 0, 0, 0, 8, 0, 0, 0, 0, 0, 0])
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid dynvec item at index 0");
        assert_eq!(
            err.cause().unwrap().to_string(),
            "Expected bytes length 1, found 3"
        );
        assert_eq!(
            err.collect_messages(),
            vec![
                "//: Invalid dynvec item at index 0",
                "//0: Expected bytes length 1, found 3",
            ]
        );
    }

    #[test]
    fn test_unaligned_offset_is_rejected() {
        let err = byte_opt_vec().unpack(&[9, 0, 0, 0, 9, 0, 0, 0, 1]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid dynvec header parsed so far: 9,9");
    }
}
