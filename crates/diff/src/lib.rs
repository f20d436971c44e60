//! Per-path narration of decoded send streams
//!
//! Turns the path index of a [`DecodedStream`](snapdiff_stream::DecodedStream)
//! into short human-readable change lines:
//! - temp_path: send-tool orphan name detection
//! - extents: coalescing of consecutive extent updates
//! - options: narrator configuration
//! - narrator: the per-path walk and line templates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extents;
pub mod narrator;
pub mod options;
pub mod temp_path;

pub use extents::{ExtentAccumulator, ExtentRun};
pub use narrator::{
    display_path, format_time, narrate, narrate_path, ElidedAction, ElidedPath, Narration,
    PathNarration, SUBVOLUME_ROOT, TIME_FORMAT,
};
pub use options::{NarrateOptions, OptionsError, TimeZoneMode};
pub use temp_path::is_temporary;
