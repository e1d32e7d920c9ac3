//! Append-only byte accumulator used while packing

use bytes::{BufMut, Bytes, BytesMut};

/// Owns the bytes produced by one `pack` call
///
/// Headers are never patched in place: composites pack their children into
/// separate buffers first, then write headers and payloads in order.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buf: BytesMut,
}

impl BinaryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append a little-endian u32 header
    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish and return the written bytes
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_only() {
        let mut writer = BinaryWriter::new();
        assert!(writer.is_empty());

        writer.write_u32(13);
        writer.write_bytes(&[1, 2]);

        assert_eq!(writer.len(), 6);
        assert_eq!(writer.into_bytes().as_ref(), &[13, 0, 0, 0, 1, 2]);
    }
}
