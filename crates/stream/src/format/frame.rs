//! Command frame format.
//!
//! # Frame Layout
//!
//! ```text
//! ┌─────────────────┬──────────────┬───────────┬───────────────────────────┐
//! │ Length (u32)    │ Opcode (u16) │ CRC (u32) │ Body (Length bytes of TLV)│
//! └─────────────────┴──────────────┴───────────┴───────────────────────────┘
//! ```
//!
//! Frames are length-prefixed, not self-synchronizing: each frame's start is
//! known only once the previous frame has been consumed. The CRC is carried
//! through but not verified.

use crate::cursor::{read_bytes, read_u16_le, read_u32_le};
use crate::format::header::HEADER_SIZE;
use snapdiff_core::{DecodeError, Opcode, Result};
use std::iter::FusedIterator;
use tracing::trace;

/// Size of the frame header in bytes
pub const FRAME_HEADER_SIZE: usize = 10;

/// One command frame, borrowing its body from the stream buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame<'a> {
    /// Emission-order index
    pub sequence: u64,

    /// Command opcode
    pub opcode: Opcode,

    /// Declared body length
    pub body_len: u32,

    /// CRC as stored (not verified)
    pub crc: u32,

    /// Frame body
    pub body: &'a [u8],

    /// Absolute offset of the frame header
    pub offset: usize,
}

impl CommandFrame<'_> {
    /// Absolute offset of the first body byte.
    pub fn body_offset(&self) -> usize {
        self.offset + FRAME_HEADER_SIZE
    }

    /// Absolute offset just past the body, where the next frame starts.
    pub fn end_offset(&self) -> usize {
        self.body_offset() + self.body.len()
    }
}

/// Read the frame starting at `offset`.
///
/// Returns the frame and the offset of the next frame.
pub fn next_frame(buf: &[u8], offset: usize, sequence: u64) -> Result<(CommandFrame<'_>, usize)> {
    let (body_len, next) = read_u32_le(buf, offset)?;
    let (opcode_id, next) = read_u16_le(buf, next)?;
    let (crc, next) = read_u32_le(buf, next)?;

    let opcode = Opcode::try_from(opcode_id).map_err(|_| DecodeError::UnknownOpcode {
        value: opcode_id,
        offset,
    })?;

    let (body, next) = read_bytes(buf, next, body_len as usize)?;

    Ok((
        CommandFrame {
            sequence,
            opcode,
            body_len,
            crc,
            body,
            offset,
        },
        next,
    ))
}

/// Lazy, finite iterator over the frames of a stream.
///
/// Yields frames up to and including the terminal one. On the first error
/// it yields that error and then stops for good.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    buf: &'a [u8],
    offset: usize,
    sequence: u64,
    finished: bool,
}

impl<'a> Frames<'a> {
    /// Iterate the frames following the stream header.
    ///
    /// The header itself is not validated here; see
    /// [`parse_header`](crate::format::parse_header).
    pub fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, HEADER_SIZE)
    }

    /// Iterate frames starting at an arbitrary offset.
    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Frames {
            buf,
            offset,
            sequence: 0,
            finished: false,
        }
    }

    /// Offset of the next frame to be read.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<CommandFrame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match next_frame(self.buf, self.offset, self.sequence) {
            Ok((frame, next)) => {
                trace!(
                    sequence = frame.sequence,
                    opcode = %frame.opcode,
                    offset = frame.offset,
                    body_len = frame.body_len,
                    "Read frame"
                );
                self.offset = next;
                self.sequence += 1;
                if frame.opcode.is_terminal() {
                    self.finished = true;
                }
                Some(Ok(frame))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Frames<'_> {}
