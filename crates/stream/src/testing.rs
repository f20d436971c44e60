//! In-memory send stream construction for tests and benchmarks
//!
//! ```
//! use snapdiff_core::Operation;
//! use snapdiff_stream::testing::StreamBuilder;
//! use snapdiff_stream::{decode, DecodeOptions};
//!
//! let buf = StreamBuilder::new(1)
//!     .command(&Operation::MakeDirectory { path: "docs".into() })
//!     .end()
//!     .build();
//! let decoded = decode(&buf, &DecodeOptions::default()).unwrap();
//! assert_eq!(decoded.commands.len(), 2);
//! ```

use crate::format::StreamHeader;
use snapdiff_core::{AttrTag, Opcode, Operation, Timespec};
use uuid::Uuid;

/// Builder for well-formed (or deliberately malformed) streams
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    /// Start a stream with a valid header.
    pub fn new(version: u32) -> Self {
        StreamBuilder {
            buf: StreamHeader::new(version).to_bytes().to_vec(),
        }
    }

    /// Start from arbitrary bytes, header included.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        StreamBuilder {
            buf: bytes.to_vec(),
        }
    }

    /// Append a frame with the given body.
    pub fn frame(self, opcode: Opcode, body: Vec<u8>) -> Self {
        self.raw_frame(u16::from(opcode), &body)
    }

    /// Append a frame with an arbitrary opcode id.
    pub fn raw_frame(mut self, opcode: u16, body: &[u8]) -> Self {
        self.buf
            .extend_from_slice(&(body.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&opcode.to_le_bytes());
        self.buf.extend_from_slice(&0u32.to_le_bytes());
        self.buf.extend_from_slice(body);
        self
    }

    /// Append raw bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append a frame encoding `op`, attributes in wire order.
    pub fn command(self, op: &Operation) -> Self {
        self.frame(op.opcode(), encode_body(op))
    }

    /// Append the terminal frame.
    pub fn end(self) -> Self {
        self.frame(Opcode::End, Vec::new())
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish and return the bytes.
    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    /// Encode one TLV attribute.
    ///
    /// # Panics
    ///
    /// If `payload` does not fit a 16-bit length.
    pub fn attr(tag: AttrTag, payload: &[u8]) -> Vec<u8> {
        assert!(
            payload.len() <= usize::from(u16::MAX),
            "attribute payload too large: {} bytes",
            payload.len()
        );
        let mut out = Vec::with_capacity(4 + payload.len());
        out.extend_from_slice(&u16::from(tag).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// Encode a string attribute.
    pub fn string_attr(tag: AttrTag, value: &str) -> Vec<u8> {
        Self::attr(tag, value.as_bytes())
    }

    /// Encode a u64 attribute.
    pub fn u64_attr(tag: AttrTag, value: u64) -> Vec<u8> {
        Self::attr(tag, &value.to_le_bytes())
    }

    /// Encode a UUID attribute.
    pub fn uuid_attr(tag: AttrTag, value: &Uuid) -> Vec<u8> {
        Self::attr(tag, value.as_bytes())
    }

    /// Encode a timespec attribute.
    pub fn timespec_attr(tag: AttrTag, value: Timespec) -> Vec<u8> {
        let mut payload = Vec::with_capacity(12);
        payload.extend_from_slice(&value.secs.to_le_bytes());
        payload.extend_from_slice(&value.nanos.to_le_bytes());
        Self::attr(tag, &payload)
    }
}

fn encode_body(op: &Operation) -> Vec<u8> {
    use StreamBuilder as B;

    let parts: Vec<Vec<u8>> = match op {
        Operation::SubvolumeCreate {
            path,
            uuid,
            ctransid,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::uuid_attr(AttrTag::Uuid, uuid),
            B::u64_attr(AttrTag::Ctransid, *ctransid),
        ],
        Operation::SnapshotCreate {
            path,
            uuid,
            ctransid,
            clone_uuid,
            clone_ctransid,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::uuid_attr(AttrTag::Uuid, uuid),
            B::u64_attr(AttrTag::Ctransid, *ctransid),
            B::uuid_attr(AttrTag::CloneUuid, clone_uuid),
            B::u64_attr(AttrTag::CloneCtransid, *clone_ctransid),
        ],
        Operation::MakeFile { path }
        | Operation::MakeDirectory { path }
        | Operation::Unlink { path }
        | Operation::RemoveDirectory { path } => vec![B::string_attr(AttrTag::Path, path)],
        Operation::MakeDeviceNode { path, mode, rdev } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::Mode, *mode),
            B::u64_attr(AttrTag::Rdev, *rdev),
        ],
        Operation::MakeFifo {
            path,
            inode,
            mode,
            rdev,
        }
        | Operation::MakeSocket {
            path,
            inode,
            mode,
            rdev,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::Ino, *inode),
            B::u64_attr(AttrTag::Mode, *mode),
            B::u64_attr(AttrTag::Rdev, *rdev),
        ],
        Operation::Symlink {
            path,
            inode,
            target,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::Ino, *inode),
            B::string_attr(AttrTag::PathLink, target),
        ],
        Operation::Rename { path, destination } => vec![
            B::string_attr(AttrTag::Path, path),
            B::string_attr(AttrTag::PathTo, destination),
        ],
        Operation::Hardlink { path, target } => vec![
            B::string_attr(AttrTag::Path, path),
            B::string_attr(AttrTag::PathLink, target),
        ],
        Operation::SetXattr { path, name, data } => vec![
            B::string_attr(AttrTag::Path, path),
            B::string_attr(AttrTag::XattrName, name),
            B::attr(AttrTag::XattrData, data),
        ],
        Operation::RemoveXattr { path, name } => vec![
            B::string_attr(AttrTag::Path, path),
            B::string_attr(AttrTag::XattrName, name),
        ],
        Operation::WriteData { path, offset, data } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::FileOffset, *offset),
            B::attr(AttrTag::Data, data),
        ],
        Operation::CloneRange {
            path,
            offset,
            length,
            source_uuid,
            source_ctransid,
            source_path,
            source_offset,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::FileOffset, *offset),
            B::u64_attr(AttrTag::CloneLen, *length),
            B::uuid_attr(AttrTag::CloneUuid, source_uuid),
            B::u64_attr(AttrTag::CloneCtransid, *source_ctransid),
            B::string_attr(AttrTag::ClonePath, source_path),
            B::u64_attr(AttrTag::CloneOffset, *source_offset),
        ],
        Operation::Truncate { path, size } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::Size, *size),
        ],
        Operation::ChangeMode { path, mode } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::Mode, *mode),
        ],
        Operation::ChangeOwner { path, uid, gid } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::Uid, *uid),
            B::u64_attr(AttrTag::Gid, *gid),
        ],
        Operation::SetTimes {
            path,
            atime,
            mtime,
            ctime,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::timespec_attr(AttrTag::Atime, *atime),
            B::timespec_attr(AttrTag::Mtime, *mtime),
            B::timespec_attr(AttrTag::Ctime, *ctime),
        ],
        Operation::UpdateExtent {
            path,
            offset,
            length,
        } => vec![
            B::string_attr(AttrTag::Path, path),
            B::u64_attr(AttrTag::FileOffset, *offset),
            B::u64_attr(AttrTag::Size, *length),
        ],
        Operation::End { .. } | Operation::Unspecified => Vec::new(),
    };

    parts.concat()
}
