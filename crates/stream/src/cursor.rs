//! Offset-threaded reads over an immutable buffer
//!
//! Every read takes `(buffer, offset)` and returns `(value, next_offset)`.
//! There is no cursor object to share: callers hold the offset and pass it
//! forward, so the only shared state is the buffer itself.
//!
//! A read that would run past the end of `buf` fails with
//! [`DecodeError::TruncatedInput`]. Callers bound reads to a frame body by
//! passing a prefix slice of the stream that ends where the body ends.

use byteorder::{ByteOrder, LittleEndian};
use snapdiff_core::{DecodeError, Result};

/// Read `len` raw bytes.
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<(&[u8], usize)> {
    let end = offset
        .checked_add(len)
        .filter(|end| *end <= buf.len())
        .ok_or(DecodeError::TruncatedInput {
            offset,
            needed: len,
            available: buf.len().saturating_sub(offset),
        })?;
    Ok((&buf[offset..end], end))
}

/// Read a single byte.
pub fn read_u8(buf: &[u8], offset: usize) -> Result<(u8, usize)> {
    let (bytes, next) = read_bytes(buf, offset, 1)?;
    Ok((bytes[0], next))
}

/// Read a little-endian `u16`.
pub fn read_u16_le(buf: &[u8], offset: usize) -> Result<(u16, usize)> {
    let (bytes, next) = read_bytes(buf, offset, 2)?;
    Ok((LittleEndian::read_u16(bytes), next))
}

/// Read a little-endian `u32`.
pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<(u32, usize)> {
    let (bytes, next) = read_bytes(buf, offset, 4)?;
    Ok((LittleEndian::read_u32(bytes), next))
}

/// Read a little-endian `u64`.
pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let (bytes, next) = read_bytes(buf, offset, 8)?;
    Ok((LittleEndian::read_u64(bytes), next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance_offset() {
        let buf = [
            0x01, 0x02, // u16
            0x03, 0x04, 0x05, 0x06, // u32
            0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, // u64
        ];

        let (a, off) = read_u16_le(&buf, 0).unwrap();
        assert_eq!((a, off), (0x0201, 2));

        let (b, off) = read_u32_le(&buf, off).unwrap();
        assert_eq!((b, off), (0x0605_0403, 6));

        let (c, off) = read_u64_le(&buf, off).unwrap();
        assert_eq!((c, off), (0x0E0D_0C0B_0A09_0807, 14));
    }

    #[test]
    fn test_read_bytes_returns_view() {
        let buf = b"btrfs-stream";
        let (bytes, next) = read_bytes(buf, 6, 6).unwrap();
        assert_eq!(bytes, b"stream");
        assert_eq!(next, 12);
    }

    #[test]
    fn test_zero_length_read_at_end() {
        let buf = [1u8, 2, 3];
        let (bytes, next) = read_bytes(&buf, 3, 0).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(next, 3);
    }

    #[test]
    fn test_truncated_read() {
        let buf = [0u8; 5];
        let err = read_u64_le(&buf, 1).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedInput {
                offset: 1,
                needed: 8,
                available: 4,
            }
        );
    }

    #[test]
    fn test_offset_past_end() {
        let buf = [0u8; 2];
        let err = read_u8(&buf, 10).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedInput {
                offset: 10,
                needed: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn test_length_overflow_is_truncation() {
        let buf = [0u8; 4];
        assert!(matches!(
            read_bytes(&buf, 2, usize::MAX),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }
}
