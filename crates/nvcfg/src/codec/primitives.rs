//! Big-endian primitive reading and writing.
//!
//! Every multi-byte value in a settings dump is big-endian. The reader keeps
//! an absolute cursor into the caller's buffer so error offsets line up with
//! the dump, not with the start of a group.

use crate::error::{Error, Result};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader positioned at `offset`.
    ///
    /// An offset past the end is accepted; the first read reports it.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        // a cursor past the end fails even for empty reads
        let data: &'a [u8] = self.data;
        let start = self.pos;
        let bytes = start
            .checked_add(n)
            .and_then(|end| data.get(start..end))
            .ok_or_else(|| Error::TruncatedInput {
                field: String::new(),
                offset: self.pos,
                needed: n,
                available: self.remaining_len(),
            })?;
        self.pos += n;
        Ok(bytes)
    }

    /// Reads a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a big-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written, which is also the offset of the
    /// next write.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes a big-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites a big-endian u16 at an earlier position.
    pub(crate) fn patch_u16(&mut self, pos: usize, value: u16) {
        self.buf[pos..pos + 2].copy_from_slice(&value.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x12);
        assert_eq!(reader.read_u16().unwrap(), 0x3456);
        assert_eq!(reader.read_u32().unwrap(), 0x789abcde);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_writer_matches_reader() {
        let mut writer = Writer::new();
        writer.write_u8(0xc8);
        writer.write_u16(0x0102);
        writer.write_u32(0xd0c20100);
        assert_eq!(writer.as_bytes(), &[0xc8, 0x01, 0x02, 0xd0, 0xc2, 0x01, 0x00]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_u8().unwrap(), 0xc8);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u32().unwrap(), 0xd0c20100);
    }

    #[test]
    fn test_truncated_reports_offset() {
        let data = [0u8; 5];
        let mut reader = Reader::at(&data, 3);
        let result = reader.read_u32();
        assert_eq!(
            result,
            Err(Error::TruncatedInput {
                field: String::new(),
                offset: 3,
                needed: 4,
                available: 2,
            })
        );
        // Position is unchanged after a failed read
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_offset_past_end() {
        let data = [0u8; 2];
        let mut reader = Reader::at(&data, 10);
        assert_eq!(reader.remaining_len(), 0);
        assert!(matches!(
            reader.read_u8(),
            Err(Error::TruncatedInput { offset: 10, available: 0, .. })
        ));
    }

    #[test]
    fn test_empty_read_past_end() {
        let data = [0u8; 2];
        let mut reader = Reader::at(&data, 10);
        assert_eq!(
            reader.read_bytes(0),
            Err(Error::TruncatedInput {
                field: String::new(),
                offset: 10,
                needed: 0,
                available: 0,
            })
        );

        let mut at_end = Reader::at(&data, 2);
        assert_eq!(at_end.read_bytes(0).unwrap(), &[] as &[u8]);
        assert_eq!(at_end.position(), 2);
    }

    #[test]
    fn test_patch_u16() {
        let mut writer = Writer::new();
        writer.write_u16(0);
        writer.write_u8(7);
        writer.patch_u16(0, 0x0302);
        assert_eq!(writer.into_bytes(), vec![0x03, 0x02, 0x07]);
    }
}
