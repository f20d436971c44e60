//! Forward-only decoder for Btrfs send streams
//!
//! This crate turns the bytes of a send stream into typed commands:
//! - cursor: offset-threaded little-endian reads
//! - tlv: typed attribute decoding
//! - format: stream header and command frames
//! - schema: per-opcode attribute table
//! - decoder: command decoding and the full decode pass
//! - index: commands grouped by path
//! - source: reading stream files and running `btrfs send`
//!
//! # Example
//!
//! ```
//! use snapdiff_stream::testing::StreamBuilder;
//! use snapdiff_stream::{decode, DecodeOptions};
//!
//! let buf = StreamBuilder::new(1).end().build();
//! let decoded = decode(&buf, &DecodeOptions::default()).unwrap();
//! assert_eq!(decoded.version(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod decoder;
pub mod format;
pub mod index;
pub mod options;
pub mod schema;
pub mod source;
pub mod testing;
pub mod tlv;

pub use decoder::{decode, decode_operation, CommandStream, DecodedStream, SendStream};
pub use format::{CommandFrame, Frames, StreamHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
pub use index::{PathIndex, PathRef, PathRole};
pub use options::{CloneLayout, DecodeOptions};
pub use source::{read_stream, SendInvocation, SourceError};
pub use tlv::{AttrShape, AttrValue};
