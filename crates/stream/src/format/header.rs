//! Stream header format.
//!
//! # Header Layout
//!
//! ```text
//! ┌──────────────────────────┬──────────────┬────────────────┐
//! │ Magic "btrfs-stream" (12)│ Reserved (1) │ Version (u32)  │
//! └──────────────────────────┴──────────────┴────────────────┘
//! ```

use crate::cursor::{read_bytes, read_u32_le, read_u8};
use snapdiff_core::{DecodeError, Result, MAGIC, MAGIC_LEN};
use tracing::debug;

/// Size of the stream header in bytes
pub const HEADER_SIZE: usize = 17;

/// Parsed stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Magic bytes: "btrfs-stream"
    pub magic: [u8; MAGIC_LEN],

    /// Stream format version
    pub version: u32,
}

impl StreamHeader {
    /// Create a header for the given version.
    pub fn new(version: u32) -> Self {
        StreamHeader {
            magic: MAGIC,
            version,
        }
    }

    /// Serialize header to bytes (reserved byte written as NUL).
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..MAGIC_LEN].copy_from_slice(&self.magic);
        bytes[13..17].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }
}

/// Parse the header at the start of `buf`.
///
/// Fails with `TruncatedInput` if `buf` is shorter than [`HEADER_SIZE`] and
/// with `BadMagic` if the magic does not match.
pub fn parse_header(buf: &[u8]) -> Result<StreamHeader> {
    if buf.len() < HEADER_SIZE {
        return Err(DecodeError::TruncatedInput {
            offset: 0,
            needed: HEADER_SIZE,
            available: buf.len(),
        });
    }

    let (magic_bytes, next) = read_bytes(buf, 0, MAGIC_LEN)?;
    let mut magic = [0u8; MAGIC_LEN];
    magic.copy_from_slice(magic_bytes);
    if magic != MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }

    // Reserved byte, normally NUL
    let (_, next) = read_u8(buf, next)?;
    let (version, _) = read_u32_le(buf, next)?;

    debug!(version, "Found a valid stream header");

    Ok(StreamHeader { magic, version })
}
