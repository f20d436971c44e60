//! Typed attribute (TLV) decoding
//!
//! ## Attribute Format
//!
//! ```text
//! ┌────────────┬──────────────┬───────────────────────┐
//! │ Tag (u16)  │ Length (u16) │ Payload (Length bytes) │
//! └────────────┴──────────────┴───────────────────────┘
//! ```
//!
//! The caller names the tag it expects; a different tag on the wire is an
//! [`DecodeError::AttributeMismatch`]. Attributes must arrive in exactly the
//! order the command schema dictates.

use crate::cursor::{read_bytes, read_u16_le};
use byteorder::{ByteOrder, LittleEndian};
use snapdiff_core::{AttrTag, DecodeError, Result, Timespec};
use uuid::Uuid;

/// Size of the attribute header (tag + length)
pub const TLV_HEADER_SIZE: usize = 4;

/// Size of a UUID payload
pub const UUID_SIZE: usize = 16;

/// Size of a timespec payload (u64 seconds + u32 nanoseconds)
pub const TIMESPEC_SIZE: usize = 12;

/// How an attribute payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrShape {
    /// Raw bytes, exposed as-is
    Bytes,
    /// UTF-8 text
    String,
    /// Little-endian u64
    U64,
    /// 16-byte UUID
    Uuid,
    /// Seconds + nanoseconds
    Timespec,
}

impl AttrShape {
    /// Exact payload width for fixed-width shapes
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            AttrShape::U64 => Some(8),
            AttrShape::Uuid => Some(UUID_SIZE),
            AttrShape::Timespec => Some(TIMESPEC_SIZE),
            AttrShape::Bytes | AttrShape::String => None,
        }
    }
}

/// A decoded attribute payload, borrowing from the stream buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue<'a> {
    /// Raw bytes
    Bytes(&'a [u8]),
    /// UTF-8 text
    String(&'a str),
    /// Unsigned integer
    U64(u64),
    /// UUID
    Uuid(Uuid),
    /// Timestamp
    Timespec(Timespec),
}

/// Read one attribute at `offset`, checking its tag and decoding its payload.
///
/// Returns the value and the offset of the byte following the attribute.
pub fn read_attribute(
    buf: &[u8],
    offset: usize,
    expected: AttrTag,
    shape: AttrShape,
) -> Result<(AttrValue<'_>, usize)> {
    let (tag, next) = read_u16_le(buf, offset)?;
    if tag != u16::from(expected) {
        return Err(DecodeError::AttributeMismatch {
            expected,
            found: tag,
            offset,
        });
    }

    let (len, next) = read_u16_le(buf, next)?;
    let (payload, next) = read_bytes(buf, next, len as usize)?;

    if let Some(width) = shape.fixed_width() {
        if payload.len() != width {
            return Err(DecodeError::InvalidEncoding {
                tag: expected,
                offset,
                detail: format!("expected {} payload bytes, found {}", width, payload.len()),
            });
        }
    }

    let value = match shape {
        AttrShape::Bytes => AttrValue::Bytes(payload),
        AttrShape::String => {
            let text = std::str::from_utf8(payload).map_err(|e| DecodeError::InvalidEncoding {
                tag: expected,
                offset,
                detail: e.to_string(),
            })?;
            AttrValue::String(text)
        }
        AttrShape::U64 => AttrValue::U64(LittleEndian::read_u64(payload)),
        AttrShape::Uuid => {
            let mut bytes = [0u8; UUID_SIZE];
            bytes.copy_from_slice(payload);
            AttrValue::Uuid(Uuid::from_bytes(bytes))
        }
        AttrShape::Timespec => AttrValue::Timespec(Timespec::new(
            LittleEndian::read_u64(&payload[0..8]),
            LittleEndian::read_u32(&payload[8..12]),
        )),
    };

    Ok((value, next))
}
