//! Core types for snapdiff
//!
//! This crate defines the foundational types shared by the decoder and the
//! narrator:
//! - Opcode: command registry with wire ids
//! - AttrTag: attribute tag registry with wire ids
//! - Command / Operation: one decoded frame, one variant per opcode
//! - Timespec: integer second + nanosecond timestamps
//! - DecodeError: fatal decode error hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attr;
pub mod command;
pub mod error;
pub mod opcode;
pub mod types;

pub use attr::{AttrTag, UnknownAttrTag};
pub use command::{Command, Operation};
pub use error::{DecodeError, Result};
pub use opcode::{Opcode, UnknownOpcode};
pub use types::Timespec;

/// Length of the stream magic
pub const MAGIC_LEN: usize = 12;

/// Magic bytes opening every send stream: "btrfs-stream"
pub const MAGIC: [u8; MAGIC_LEN] = *b"btrfs-stream";
