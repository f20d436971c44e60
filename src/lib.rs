//! snapdiff - decode Btrfs send streams and narrate snapshot differences
//!
//! A send stream is the serialized list of filesystem operations that turns
//! one snapshot into another. This crate decodes it into typed commands,
//! groups them by path, and renders short per-path change lines.
//!
//! # Quick Start
//!
//! ```
//! use snapdiff::testing::StreamBuilder;
//! use snapdiff::{decode, narrate, DecodeOptions, NarrateOptions, Operation};
//!
//! let buf = StreamBuilder::new(1)
//!     .command(&Operation::MakeDirectory { path: "foo".into() })
//!     .end()
//!     .build();
//!
//! let decoded = decode(&buf, &DecodeOptions::default())?;
//! let narration = narrate(&decoded, &NarrateOptions::default());
//! assert_eq!(narration.paths[0].actions, vec!["mkdir"]);
//! # Ok::<(), snapdiff::DecodeError>(())
//! ```
//!
//! # Architecture
//!
//! - `snapdiff-core`: opcode and attribute registries, command model, errors
//! - `snapdiff-stream`: header/frame/attribute decoding and the path index
//! - `snapdiff-diff`: the narrator

pub use snapdiff_core::{
    AttrTag, Command, DecodeError, Opcode, Operation, Result, Timespec, MAGIC,
};
pub use snapdiff_diff::{
    is_temporary, narrate, ElidedAction, ElidedPath, NarrateOptions, Narration, OptionsError,
    PathNarration, TimeZoneMode,
};
pub use snapdiff_stream::{
    decode, read_stream, testing, CloneLayout, CommandFrame, CommandStream, DecodeOptions,
    DecodedStream, Frames, PathIndex, PathRef, PathRole, SendInvocation, SendStream, SourceError,
    StreamHeader,
};
