//! Decoded command model
//!
//! One [`Operation`] variant per opcode, each owning only the fields its
//! schema declares. A [`Command`] pairs the operation with its emission-order
//! sequence index; everything downstream (path index, narrator) refers to
//! commands by that index instead of holding the value.
//!
//! Serialization is tagged by opcode (`{"sequence": 3, "opcode": "rename", ...}`),
//! UUIDs render as 32 lowercase hex characters and raw payloads as base64.

use crate::opcode::Opcode;
use crate::types::Timespec;
use serde::Serialize;
use uuid::Uuid;

/// One decoded frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Emission-order index, starting at 0, one per frame
    pub sequence: u64,

    /// Decoded payload
    #[serde(flatten)]
    pub op: Operation,
}

impl Command {
    /// Create a command
    pub fn new(sequence: u64, op: Operation) -> Self {
        Command { sequence, op }
    }

    /// Opcode of this command
    pub fn opcode(&self) -> Opcode {
        self.op.opcode()
    }

    /// Primary path, `None` only for `End` and `Unspecified`
    pub fn path(&self) -> Option<&str> {
        self.op.path()
    }
}

/// Per-opcode payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "opcode", rename_all = "snake_case")]
pub enum Operation {
    /// Full-send subvolume creation
    SubvolumeCreate {
        /// Subvolume path
        path: String,
        /// Subvolume UUID
        #[serde(serialize_with = "encoding::uuid_hex")]
        uuid: Uuid,
        /// Change transaction id
        ctransid: u64,
    },

    /// Incremental-send snapshot creation
    SnapshotCreate {
        /// Snapshot path
        path: String,
        /// Snapshot UUID
        #[serde(serialize_with = "encoding::uuid_hex")]
        uuid: Uuid,
        /// Change transaction id
        ctransid: u64,
        /// Parent snapshot UUID
        #[serde(serialize_with = "encoding::uuid_hex")]
        clone_uuid: Uuid,
        /// Parent change transaction id
        clone_ctransid: u64,
    },

    /// Regular file creation
    MakeFile {
        /// New file path
        path: String,
    },

    /// Directory creation
    MakeDirectory {
        /// New directory path
        path: String,
    },

    /// Device node creation
    MakeDeviceNode {
        /// Node path
        path: String,
        /// Mode bits (including file type)
        mode: u64,
        /// Device number
        rdev: u64,
    },

    /// Named pipe creation
    MakeFifo {
        /// Pipe path
        path: String,
        /// Inode number
        inode: u64,
        /// Mode bits
        mode: u64,
        /// Device number
        rdev: u64,
    },

    /// Unix socket creation
    MakeSocket {
        /// Socket path
        path: String,
        /// Inode number
        inode: u64,
        /// Mode bits
        mode: u64,
        /// Device number
        rdev: u64,
    },

    /// Symbolic link creation
    Symlink {
        /// Link path
        path: String,
        /// Inode number
        inode: u64,
        /// Link target
        target: String,
    },

    /// Rename
    Rename {
        /// Source path
        path: String,
        /// Destination path
        destination: String,
    },

    /// Hard link creation
    Hardlink {
        /// New link path
        path: String,
        /// Existing path linked to
        target: String,
    },

    /// Non-directory removal
    Unlink {
        /// Removed path
        path: String,
    },

    /// Directory removal
    RemoveDirectory {
        /// Removed directory
        path: String,
    },

    /// Extended attribute set
    SetXattr {
        /// Target path
        path: String,
        /// Attribute name
        name: String,
        /// Attribute value
        #[serde(serialize_with = "encoding::base64_bytes")]
        data: Vec<u8>,
    },

    /// Extended attribute removal
    RemoveXattr {
        /// Target path
        path: String,
        /// Attribute name
        name: String,
    },

    /// File content write
    WriteData {
        /// Written file
        path: String,
        /// Offset of the write
        offset: u64,
        /// Written bytes
        #[serde(serialize_with = "encoding::base64_bytes")]
        data: Vec<u8>,
    },

    /// Range clone from another file
    CloneRange {
        /// Destination file
        path: String,
        /// Destination offset
        offset: u64,
        /// Cloned length
        length: u64,
        /// Source subvolume UUID
        #[serde(serialize_with = "encoding::uuid_hex")]
        source_uuid: Uuid,
        /// Source transaction id
        source_ctransid: u64,
        /// Source file
        source_path: String,
        /// Source offset
        source_offset: u64,
    },

    /// Size change
    Truncate {
        /// Target file
        path: String,
        /// New size in bytes
        size: u64,
    },

    /// Mode change
    ChangeMode {
        /// Target path
        path: String,
        /// New mode bits
        mode: u64,
    },

    /// Owner change
    ChangeOwner {
        /// Target path
        path: String,
        /// New user id
        uid: u64,
        /// New group id
        gid: u64,
    },

    /// Timestamp update
    SetTimes {
        /// Target path
        path: String,
        /// Access time
        atime: Timespec,
        /// Modification time
        mtime: Timespec,
        /// Change time
        ctime: Timespec,
    },

    /// Extent update without payload
    UpdateExtent {
        /// Target file
        path: String,
        /// Start of the extent
        offset: u64,
        /// Extent length
        length: u64,
    },

    /// Terminal command
    End {
        /// Offset just past the terminal frame
        end_offset: u64,
        /// Length of the decoded buffer
        stream_length: u64,
    },

    /// Placeholder command
    Unspecified,
}

impl Operation {
    /// Opcode this payload was decoded from
    pub fn opcode(&self) -> Opcode {
        match self {
            Operation::SubvolumeCreate { .. } => Opcode::SubvolumeCreate,
            Operation::SnapshotCreate { .. } => Opcode::SnapshotCreate,
            Operation::MakeFile { .. } => Opcode::MakeFile,
            Operation::MakeDirectory { .. } => Opcode::MakeDirectory,
            Operation::MakeDeviceNode { .. } => Opcode::MakeDeviceNode,
            Operation::MakeFifo { .. } => Opcode::MakeFifo,
            Operation::MakeSocket { .. } => Opcode::MakeSocket,
            Operation::Symlink { .. } => Opcode::Symlink,
            Operation::Rename { .. } => Opcode::Rename,
            Operation::Hardlink { .. } => Opcode::Hardlink,
            Operation::Unlink { .. } => Opcode::Unlink,
            Operation::RemoveDirectory { .. } => Opcode::RemoveDirectory,
            Operation::SetXattr { .. } => Opcode::SetXattr,
            Operation::RemoveXattr { .. } => Opcode::RemoveXattr,
            Operation::WriteData { .. } => Opcode::WriteData,
            Operation::CloneRange { .. } => Opcode::CloneRange,
            Operation::Truncate { .. } => Opcode::Truncate,
            Operation::ChangeMode { .. } => Opcode::ChangeMode,
            Operation::ChangeOwner { .. } => Opcode::ChangeOwner,
            Operation::SetTimes { .. } => Opcode::SetTimes,
            Operation::UpdateExtent { .. } => Opcode::UpdateExtent,
            Operation::End { .. } => Opcode::End,
            Operation::Unspecified => Opcode::Unspecified,
        }
    }

    /// Primary path of the payload
    pub fn path(&self) -> Option<&str> {
        match self {
            Operation::SubvolumeCreate { path, .. }
            | Operation::SnapshotCreate { path, .. }
            | Operation::MakeFile { path }
            | Operation::MakeDirectory { path }
            | Operation::MakeDeviceNode { path, .. }
            | Operation::MakeFifo { path, .. }
            | Operation::MakeSocket { path, .. }
            | Operation::Symlink { path, .. }
            | Operation::Rename { path, .. }
            | Operation::Hardlink { path, .. }
            | Operation::Unlink { path }
            | Operation::RemoveDirectory { path }
            | Operation::SetXattr { path, .. }
            | Operation::RemoveXattr { path, .. }
            | Operation::WriteData { path, .. }
            | Operation::CloneRange { path, .. }
            | Operation::Truncate { path, .. }
            | Operation::ChangeMode { path, .. }
            | Operation::ChangeOwner { path, .. }
            | Operation::SetTimes { path, .. }
            | Operation::UpdateExtent { path, .. } => Some(path),
            Operation::End { .. } | Operation::Unspecified => None,
        }
    }

    /// Rename destination, for rename payloads only
    pub fn rename_destination(&self) -> Option<&str> {
        match self {
            Operation::Rename { destination, .. } => Some(destination),
            _ => None,
        }
    }
}

mod encoding {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::Serializer;
    use uuid::Uuid;

    pub(super) fn uuid_hex<S: Serializer>(uuid: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&uuid.simple())
    }

    pub(super) fn base64_bytes<S: Serializer>(
        data: &[u8],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }
}
