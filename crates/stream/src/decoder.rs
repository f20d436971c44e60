//! Send stream decoder
//!
//! Decoding is a single forward pass over an immutable buffer:
//!
//! 1. [`SendStream::parse`] validates the 17-byte header.
//! 2. [`Frames`] walks the length-prefixed frames.
//! 3. Each frame body is decoded against its opcode schema into an
//!    [`Operation`], yielding [`Command`]s through [`CommandStream`].
//! 4. [`SendStream::decode`] collects commands and builds the [`PathIndex`]
//!    in the same pass.
//!
//! The first error aborts the pass. [`decode`] then returns only the error;
//! callers that want the commands decoded before the failure iterate
//! [`SendStream::commands`] instead.

use crate::format::{parse_header, CommandFrame, Frames, StreamHeader};
use crate::index::PathIndex;
use crate::options::{CloneLayout, DecodeOptions};
use crate::schema::{schema, AttrOrigin, AttrSpec};
use crate::tlv::{read_attribute, AttrValue};
use snapdiff_core::{AttrTag, Command, DecodeError, Opcode, Operation, Result, Timespec};
use std::iter::FusedIterator;
use tracing::debug;
use uuid::Uuid;

/// Result of a complete decode pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedStream {
    /// Stream header
    pub header: StreamHeader,

    /// Every frame in emission order; `commands[i].sequence == i`
    pub commands: Vec<Command>,

    /// Commands grouped by path
    pub paths: PathIndex,
}

impl DecodedStream {
    /// Stream format version
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Command with the given sequence index
    pub fn command(&self, sequence: u64) -> Option<&Command> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.commands.get(i))
    }

    /// `(end_offset, stream_length)` of the terminal command
    pub fn end(&self) -> Option<(u64, u64)> {
        match self.commands.last().map(|c| &c.op) {
            Some(Operation::End {
                end_offset,
                stream_length,
            }) => Some((*end_offset, *stream_length)),
            _ => None,
        }
    }
}

/// A send stream whose header has been validated
#[derive(Debug, Clone, Copy)]
pub struct SendStream<'a> {
    buf: &'a [u8],
    header: StreamHeader,
}

impl<'a> SendStream<'a> {
    /// Validate the header of `buf`.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let header = parse_header(buf)?;
        Ok(SendStream { buf, header })
    }

    /// Parsed header
    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// Underlying buffer
    pub fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    /// Raw frames following the header.
    pub fn frames(&self) -> Frames<'a> {
        Frames::new(self.buf)
    }

    /// Decoded commands, lazily.
    pub fn commands(&self, options: &DecodeOptions) -> CommandStream<'a> {
        CommandStream {
            buf: self.buf,
            frames: self.frames(),
            clone_layout: options.clone_layout,
            failed: false,
        }
    }

    /// Decode every command and build the path index.
    pub fn decode(&self, options: &DecodeOptions) -> Result<DecodedStream> {
        let mut commands = Vec::new();
        let mut paths = PathIndex::new();

        for command in self.commands(options) {
            let command = command?;
            paths.record(&command, options.synthesize_lineage);
            commands.push(command);
        }

        debug!(
            version = self.header.version,
            commands = commands.len(),
            paths = paths.len(),
            "Decoded send stream"
        );

        Ok(DecodedStream {
            header: self.header,
            commands,
            paths,
        })
    }
}

/// Decode a complete send stream held in memory.
pub fn decode(buf: &[u8], options: &DecodeOptions) -> Result<DecodedStream> {
    SendStream::parse(buf)?.decode(options)
}

/// Lazy iterator of decoded commands
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct CommandStream<'a> {
    buf: &'a [u8],
    frames: Frames<'a>,
    clone_layout: CloneLayout,
    failed: bool,
}

impl Iterator for CommandStream<'_> {
    type Item = Result<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let decoded = self.frames.next()?.and_then(|frame| {
            decode_operation(self.buf, &frame, self.clone_layout)
                .map(|op| Command::new(frame.sequence, op))
        });

        if decoded.is_err() {
            self.failed = true;
        }
        Some(decoded)
    }
}

impl FusedIterator for CommandStream<'_> {}

/// Decode one frame body into its operation.
///
/// `buf` is the whole stream; attribute reads are bounded to the frame body.
pub fn decode_operation(
    buf: &[u8],
    frame: &CommandFrame<'_>,
    clone_layout: CloneLayout,
) -> Result<Operation> {
    let end = frame.end_offset();
    let scope = buf.get(..end).ok_or(DecodeError::TruncatedInput {
        offset: frame.offset,
        needed: end - frame.offset,
        available: buf.len().saturating_sub(frame.offset),
    })?;
    let mut f = Fields::read(scope, frame, schema(frame.opcode, clone_layout))?;

    // Field initializers run in source order, which matches the schema order.
    let op = match frame.opcode {
        Opcode::Unspecified => Operation::Unspecified,
        Opcode::SubvolumeCreate => Operation::SubvolumeCreate {
            path: f.string()?,
            uuid: f.uuid()?,
            ctransid: f.u64()?,
        },
        Opcode::SnapshotCreate => Operation::SnapshotCreate {
            path: f.string()?,
            uuid: f.uuid()?,
            ctransid: f.u64()?,
            clone_uuid: f.uuid()?,
            clone_ctransid: f.u64()?,
        },
        Opcode::MakeFile => Operation::MakeFile { path: f.string()? },
        Opcode::MakeDirectory => Operation::MakeDirectory { path: f.string()? },
        Opcode::MakeDeviceNode => Operation::MakeDeviceNode {
            path: f.string()?,
            mode: f.u64()?,
            rdev: f.u64()?,
        },
        Opcode::MakeFifo => Operation::MakeFifo {
            path: f.string()?,
            inode: f.u64()?,
            mode: f.u64()?,
            rdev: f.u64()?,
        },
        Opcode::MakeSocket => Operation::MakeSocket {
            path: f.string()?,
            inode: f.u64()?,
            mode: f.u64()?,
            rdev: f.u64()?,
        },
        Opcode::Symlink => Operation::Symlink {
            path: f.string()?,
            inode: f.u64()?,
            target: f.string()?,
        },
        Opcode::Rename => Operation::Rename {
            path: f.string()?,
            destination: f.string()?,
        },
        Opcode::Hardlink => Operation::Hardlink {
            path: f.string()?,
            target: f.string()?,
        },
        Opcode::Unlink => Operation::Unlink { path: f.string()? },
        Opcode::RemoveDirectory => Operation::RemoveDirectory { path: f.string()? },
        Opcode::SetXattr => Operation::SetXattr {
            path: f.string()?,
            name: f.string()?,
            data: f.bytes()?,
        },
        Opcode::RemoveXattr => Operation::RemoveXattr {
            path: f.string()?,
            name: f.string()?,
        },
        Opcode::WriteData => Operation::WriteData {
            path: f.string()?,
            offset: f.u64()?,
            data: f.bytes()?,
        },
        Opcode::CloneRange => Operation::CloneRange {
            path: f.string()?,
            offset: f.u64()?,
            length: f.u64()?,
            source_uuid: f.uuid()?,
            source_ctransid: f.u64()?,
            source_path: f.string()?,
            source_offset: f.u64()?,
        },
        Opcode::Truncate => Operation::Truncate {
            path: f.string()?,
            size: f.u64()?,
        },
        Opcode::ChangeMode => Operation::ChangeMode {
            path: f.string()?,
            mode: f.u64()?,
        },
        Opcode::ChangeOwner => Operation::ChangeOwner {
            path: f.string()?,
            uid: f.u64()?,
            gid: f.u64()?,
        },
        Opcode::SetTimes => Operation::SetTimes {
            path: f.string()?,
            atime: f.timespec()?,
            mtime: f.timespec()?,
            ctime: f.timespec()?,
        },
        Opcode::UpdateExtent => Operation::UpdateExtent {
            path: f.string()?,
            offset: f.u64()?,
            length: f.u64()?,
        },
        Opcode::End => {
            let end_offset = frame.end_offset();
            if end_offset < buf.len() {
                return Err(DecodeError::TrailingGarbage {
                    end_offset,
                    stream_length: buf.len(),
                });
            }
            debug!(sequence = frame.sequence, end_offset, "Reached end command");
            Operation::End {
                end_offset: end_offset as u64,
                stream_length: buf.len() as u64,
            }
        }
    };

    Ok(op)
}

/// Attribute values of one frame, consumed in schema order
struct Fields<'a> {
    values: std::vec::IntoIter<(AttrTag, usize, AttrValue<'a>)>,
    frame_offset: usize,
}

impl<'a> Fields<'a> {
    fn read(scope: &'a [u8], frame: &CommandFrame<'_>, specs: &[AttrSpec]) -> Result<Self> {
        let mut values = Vec::with_capacity(specs.len());
        let mut offset = frame.body_offset();

        for spec in specs {
            let start = match spec.origin {
                AttrOrigin::Cursor => offset,
                AttrOrigin::BodyStart => frame.body_offset(),
            };
            let (value, next) = read_attribute(scope, start, spec.tag, spec.shape)?;
            values.push((spec.tag, start, value));
            offset = next;
        }

        Ok(Fields {
            values: values.into_iter(),
            frame_offset: frame.offset,
        })
    }

    fn take(&mut self, want: &str) -> Result<(AttrTag, usize, AttrValue<'a>)> {
        self.values.next().ok_or_else(|| DecodeError::InvalidEncoding {
            tag: AttrTag::Unspec,
            offset: self.frame_offset,
            detail: format!("missing {} field", want),
        })
    }

    fn shape_error(tag: AttrTag, offset: usize, want: &str) -> DecodeError {
        DecodeError::InvalidEncoding {
            tag,
            offset,
            detail: format!("expected {} field", want),
        }
    }

    fn string(&mut self) -> Result<String> {
        match self.take("string")? {
            (_, _, AttrValue::String(s)) => Ok(s.to_owned()),
            (tag, offset, _) => Err(Self::shape_error(tag, offset, "string")),
        }
    }

    fn bytes(&mut self) -> Result<Vec<u8>> {
        match self.take("bytes")? {
            (_, _, AttrValue::Bytes(b)) => Ok(b.to_vec()),
            (tag, offset, _) => Err(Self::shape_error(tag, offset, "bytes")),
        }
    }

    fn u64(&mut self) -> Result<u64> {
        match self.take("integer")? {
            (_, _, AttrValue::U64(v)) => Ok(v),
            (tag, offset, _) => Err(Self::shape_error(tag, offset, "integer")),
        }
    }

    fn uuid(&mut self) -> Result<Uuid> {
        match self.take("uuid")? {
            (_, _, AttrValue::Uuid(v)) => Ok(v),
            (tag, offset, _) => Err(Self::shape_error(tag, offset, "uuid")),
        }
    }

    fn timespec(&mut self) -> Result<Timespec> {
        match self.take("timespec")? {
            (_, _, AttrValue::Timespec(v)) => Ok(v),
            (tag, offset, _) => Err(Self::shape_error(tag, offset, "timespec")),
        }
    }
}
