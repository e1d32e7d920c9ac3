//! Constants of the molecule wire layout

/// Size of every length, count, offset and tag header (u32, little-endian)
pub const NUMBER_SIZE: usize = 4;

/// Smallest valid dynvec/table encoding that carries at least one item:
/// total length header plus one offset
pub const MIN_NON_EMPTY_DYNAMIC_SIZE: usize = 2 * NUMBER_SIZE;

/// Name of the primitive byte codec
pub const BYTE_NAME: &str = "byte";

/// Indentation used for fields and variants in multi-line schema blocks
pub const SCHEMA_INDENT: &str = "    ";

/// Read a little-endian u32 header at `offset`
///
/// The caller guarantees `offset + NUMBER_SIZE <= bytes.len()`.
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
