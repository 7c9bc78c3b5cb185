//! Positional reader over a seekable byte source
//!
//! All reads are little-endian. Every read or skip is checked against the
//! stream length first, so a corrupt length field fails with
//! [`BundleError::TruncatedInput`] before anything is allocated.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{BundleError, Result};

/// Byte-stream reader that tracks its absolute position
pub struct ChunkReader<R> {
    inner: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Wrap a stream. Reading starts at the stream's current position; offsets
    /// (and alignment) are absolute stream offsets.
    pub fn new(mut inner: R) -> Result<Self> {
        let position = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;
        Ok(Self {
            inner,
            position,
            len,
        })
    }

    /// Current absolute offset
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total stream length
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Read exactly `n` bytes
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n as u64)?;
        let mut buf = vec![0u8; n];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| self.map_eof(e, n as u64))?;
        self.position += n as u64;
        Ok(buf)
    }

    /// Read a 4-byte chunk tag
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        self.ensure(4)?;
        let mut tag = [0u8; 4];
        self.inner
            .read_exact(&mut tag)
            .map_err(|e| self.map_eof(e, 4))?;
        self.position += 4;
        Ok(tag)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        let v = self
            .inner
            .read_i32::<LittleEndian>()
            .map_err(|e| self.map_eof(e, 4))?;
        self.position += 4;
        Ok(v)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        let v = self
            .inner
            .read_f32::<LittleEndian>()
            .map_err(|e| self.map_eof(e, 4))?;
        self.position += 4;
        Ok(v)
    }

    /// Read an i32 that must not be negative (a count or byte length)
    pub fn read_len(&mut self, field: &'static str) -> Result<usize> {
        let offset = self.position;
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| BundleError::NegativeField {
            field,
            value,
            offset,
        })
    }

    /// Advance `n` bytes without copying
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.ensure(n)?;
        let delta = i64::try_from(n).map_err(|_| self.truncated(n))?;
        self.inner.seek(SeekFrom::Current(delta))?;
        self.position += n;
        Ok(())
    }

    /// Pad the cursor to the next multiple of `alignment`. Returns the number
    /// of padding bytes skipped (0 when already aligned).
    pub fn align(&mut self, alignment: u64) -> Result<u64> {
        let offset = self.position % alignment;
        if offset == 0 {
            return Ok(0);
        }
        let padding = alignment - offset;
        self.skip(padding)?;
        Ok(padding)
    }

    /// Give the wrapped stream back
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn ensure(&self, n: u64) -> Result<()> {
        if n > self.remaining() {
            return Err(self.truncated(n));
        }
        Ok(())
    }

    fn truncated(&self, need: u64) -> BundleError {
        BundleError::TruncatedInput {
            offset: self.position,
            need,
            have: self.remaining(),
        }
    }

    fn map_eof(&self, e: io::Error, need: u64) -> BundleError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            self.truncated(need)
        } else {
            BundleError::Io(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> ChunkReader<Cursor<&[u8]>> {
        ChunkReader::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_reads_little_endian_scalars() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-2i32).to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        let mut r = reader(&data);

        assert_eq!(r.read_i32().unwrap(), -2);
        assert_eq!(r.read_f32().unwrap(), 1.5);
        assert_eq!(r.position(), 8);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_read_tag() {
        let mut r = reader(b"SPRTrest");
        assert_eq!(&r.read_tag().unwrap(), b"SPRT");
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn test_read_exact_past_end_is_truncated() {
        let mut r = reader(&[1, 2, 3]);
        let err = r.read_exact(4).unwrap_err();
        assert!(matches!(
            err,
            BundleError::TruncatedInput {
                offset: 0,
                need: 4,
                have: 3
            }
        ));
        // Cursor does not move on failure
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_huge_length_fails_before_allocating() {
        let mut r = reader(&[0; 8]);
        assert!(matches!(
            r.read_exact(usize::MAX / 2),
            Err(BundleError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_partial_scalar_is_truncated() {
        let mut r = reader(&[0, 0]);
        assert!(matches!(
            r.read_i32(),
            Err(BundleError::TruncatedInput { need: 4, have: 2, .. })
        ));
    }

    #[test]
    fn test_read_len_rejects_negative() {
        let data = (-1i32).to_le_bytes();
        let mut r = reader(&data);
        assert!(matches!(
            r.read_len("name length"),
            Err(BundleError::NegativeField {
                field: "name length",
                value: -1,
                offset: 0
            })
        ));
    }

    #[test]
    fn test_skip_past_end_is_truncated() {
        let mut r = reader(&[0; 4]);
        r.skip(3).unwrap();
        assert_eq!(r.position(), 3);
        assert!(matches!(
            r.skip(2),
            Err(BundleError::TruncatedInput { offset: 3, .. })
        ));
    }

    #[test]
    fn test_align_for_every_remainder() {
        // Variable-length field of length L, starting on a boundary
        for len in 0..=8usize {
            let data = vec![0u8; 16];
            let mut r = reader(&data);
            r.read_exact(len).unwrap();
            let padding = r.align(4).unwrap();

            assert_eq!(r.position() % 4, 0, "len {len}");
            assert_eq!(padding, ((4 - len % 4) % 4) as u64, "len {len}");
        }
    }

    #[test]
    fn test_align_is_absolute() {
        let data = [0u8; 12];
        let mut cursor = Cursor::new(&data[..]);
        cursor.set_position(5);
        let mut r = ChunkReader::new(cursor).unwrap();

        assert_eq!(r.position(), 5);
        assert_eq!(r.align(4).unwrap(), 3);
        assert_eq!(r.position(), 8);
    }

    #[test]
    fn test_align_past_end_is_truncated() {
        let mut r = reader(&[0; 5]);
        r.read_exact(5).unwrap();
        assert!(matches!(
            r.align(4),
            Err(BundleError::TruncatedInput { need: 3, have: 0, .. })
        ));
    }
}
