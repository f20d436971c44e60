//! On-wire byte formats of the send stream.
//!
//! # Module Structure
//!
//! - `header`: 17-byte global header
//! - `frame`: length-prefixed command frames and the frame iterator

pub mod frame;
pub mod header;

pub use frame::{next_frame, CommandFrame, Frames, FRAME_HEADER_SIZE};
pub use header::{parse_header, StreamHeader, HEADER_SIZE};
