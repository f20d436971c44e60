//! Error types for send stream decoding
//!
//! Every decode error is fatal for the pass that produced it: the format is
//! length-prefixed and forward-only, so once one frame or attribute fails to
//! match its expected shape no later byte offset can be trusted.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::attr::AttrTag;
use crate::MAGIC_LEN;
use thiserror::Error;

/// Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Fatal decode errors
///
/// Offsets are absolute byte positions within the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The 12-byte prefix is not the stream magic
    #[error("Not a Btrfs stream: bad magic \"{}\"", .found.escape_ascii())]
    BadMagic {
        /// The bytes found where the magic was expected
        found: [u8; MAGIC_LEN],
    },

    /// A read ran past the end of the buffer (or of the enclosing frame body)
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// Offset of the read
        offset: usize,
        /// Bytes requested
        needed: usize,
        /// Bytes left before the limit
        available: usize,
    },

    /// Frame opcode outside the known opcode table
    #[error("Unknown command {value} at offset {offset}")]
    UnknownOpcode {
        /// Raw opcode id
        value: u16,
        /// Offset of the frame header
        offset: usize,
    },

    /// Attribute tag differs from the one the command schema expects
    #[error("Unexpected attribute {} at offset {offset} (expected {})", describe_found(.found), .expected.name())]
    AttributeMismatch {
        /// Tag dictated by the schema
        expected: AttrTag,
        /// Raw tag read from the stream
        found: u16,
        /// Offset of the TLV header
        offset: usize,
    },

    /// Attribute payload cannot be decoded into its declared shape
    #[error("Invalid {} attribute at offset {offset}: {detail}", .tag.name())]
    InvalidEncoding {
        /// Attribute being decoded
        tag: AttrTag,
        /// Offset of the TLV header
        offset: usize,
        /// What was wrong with the payload
        detail: String,
    },

    /// The terminal command does not end exactly at the end of the buffer
    #[error("Trailing data after end command: stream ends at {end_offset}, buffer holds {stream_length} bytes")]
    TrailingGarbage {
        /// Offset just past the terminal frame
        end_offset: usize,
        /// Total buffer length
        stream_length: usize,
    },
}

fn describe_found(found: &u16) -> String {
    AttrTag::describe(*found)
}

impl DecodeError {
    /// Absolute offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::BadMagic { .. } => 0,
            DecodeError::TruncatedInput { offset, .. }
            | DecodeError::UnknownOpcode { offset, .. }
            | DecodeError::AttributeMismatch { offset, .. }
            | DecodeError::InvalidEncoding { offset, .. } => *offset,
            DecodeError::TrailingGarbage { end_offset, .. } => *end_offset,
        }
    }
}
