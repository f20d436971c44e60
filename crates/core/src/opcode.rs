//! Command opcode registry
//!
//! Opcodes are 16-bit ids in each frame header. The table is dense: every id
//! below [`Opcode::COUNT`] is a known command, anything at or above it is
//! rejected by the framer.
//!
//! | Id | Opcode | Short name |
//! |----|--------|------------|
//! | 0 | Unspecified | `unspec` |
//! | 1 | SubvolumeCreate | `subvol` |
//! | 2 | SnapshotCreate | `snapshot` |
//! | 3 | MakeFile | `mkfile` |
//! | 4 | MakeDirectory | `mkdir` |
//! | 5 | MakeDeviceNode | `mknod` |
//! | 6 | MakeFifo | `mkfifo` |
//! | 7 | MakeSocket | `mksock` |
//! | 8 | Symlink | `symlink` |
//! | 9 | Rename | `rename` |
//! | 10 | Hardlink | `link` |
//! | 11 | Unlink | `unlink` |
//! | 12 | RemoveDirectory | `rmdir` |
//! | 13 | SetXattr | `set_xattr` |
//! | 14 | RemoveXattr | `remove_xattr` |
//! | 15 | WriteData | `write` |
//! | 16 | CloneRange | `clone` |
//! | 17 | Truncate | `truncate` |
//! | 18 | ChangeMode | `chmod` |
//! | 19 | ChangeOwner | `chown` |
//! | 20 | SetTimes | `utimes` |
//! | 21 | End | `end` |
//! | 22 | UpdateExtent | `update_extent` |

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Command opcodes with explicit wire values
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// Placeholder command, carries nothing
    Unspecified = 0,
    /// Create a subvolume (full send)
    SubvolumeCreate = 1,
    /// Create a snapshot of a parent (incremental send)
    SnapshotCreate = 2,
    /// Create a regular file
    MakeFile = 3,
    /// Create a directory
    MakeDirectory = 4,
    /// Create a device node
    MakeDeviceNode = 5,
    /// Create a named pipe
    MakeFifo = 6,
    /// Create a unix socket
    MakeSocket = 7,
    /// Create a symbolic link
    Symlink = 8,
    /// Rename a path
    Rename = 9,
    /// Create a hard link
    Hardlink = 10,
    /// Remove a non-directory
    Unlink = 11,
    /// Remove a directory
    RemoveDirectory = 12,
    /// Set an extended attribute
    SetXattr = 13,
    /// Remove an extended attribute
    RemoveXattr = 14,
    /// Write file content
    WriteData = 15,
    /// Share a byte range from another file
    CloneRange = 16,
    /// Set file size
    Truncate = 17,
    /// Change mode bits
    ChangeMode = 18,
    /// Change owner and group
    ChangeOwner = 19,
    /// Set access/modification/change times
    SetTimes = 20,
    /// Terminal command
    End = 21,
    /// Extent changed without data (`--no-data` sends)
    UpdateExtent = 22,
}

impl Opcode {
    /// Number of entries in the opcode table
    pub const COUNT: usize = 23;

    /// All opcodes in wire order
    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Unspecified,
        Opcode::SubvolumeCreate,
        Opcode::SnapshotCreate,
        Opcode::MakeFile,
        Opcode::MakeDirectory,
        Opcode::MakeDeviceNode,
        Opcode::MakeFifo,
        Opcode::MakeSocket,
        Opcode::Symlink,
        Opcode::Rename,
        Opcode::Hardlink,
        Opcode::Unlink,
        Opcode::RemoveDirectory,
        Opcode::SetXattr,
        Opcode::RemoveXattr,
        Opcode::WriteData,
        Opcode::CloneRange,
        Opcode::Truncate,
        Opcode::ChangeMode,
        Opcode::ChangeOwner,
        Opcode::SetTimes,
        Opcode::End,
        Opcode::UpdateExtent,
    ];

    /// Short lowercase name, as printed by the send tooling
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Unspecified => "unspec",
            Opcode::SubvolumeCreate => "subvol",
            Opcode::SnapshotCreate => "snapshot",
            Opcode::MakeFile => "mkfile",
            Opcode::MakeDirectory => "mkdir",
            Opcode::MakeDeviceNode => "mknod",
            Opcode::MakeFifo => "mkfifo",
            Opcode::MakeSocket => "mksock",
            Opcode::Symlink => "symlink",
            Opcode::Rename => "rename",
            Opcode::Hardlink => "link",
            Opcode::Unlink => "unlink",
            Opcode::RemoveDirectory => "rmdir",
            Opcode::SetXattr => "set_xattr",
            Opcode::RemoveXattr => "remove_xattr",
            Opcode::WriteData => "write",
            Opcode::CloneRange => "clone",
            Opcode::Truncate => "truncate",
            Opcode::ChangeMode => "chmod",
            Opcode::ChangeOwner => "chown",
            Opcode::SetTimes => "utimes",
            Opcode::End => "end",
            Opcode::UpdateExtent => "update_extent",
        }
    }

    /// Whether this opcode terminates the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Opcode::End)
    }

    /// Whether commands with this opcode carry a primary path
    pub fn has_path(&self) -> bool {
        !matches!(self, Opcode::End | Opcode::Unspecified)
    }

    /// Whether this opcode brings a new inode into existence
    ///
    /// These are the commands the send tool issues under a temporary
    /// `o<ino>-<gen>-0` name before renaming into place.
    pub fn is_create_like(&self) -> bool {
        matches!(
            self,
            Opcode::MakeFile | Opcode::MakeDirectory | Opcode::Symlink
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error when parsing an opcode id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown command id {0} (table holds {})", Opcode::COUNT)]
pub struct UnknownOpcode(pub u16);

impl TryFrom<u16> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(value as usize)
            .copied()
            .ok_or(UnknownOpcode(value))
    }
}

impl From<Opcode> for u16 {
    fn from(opcode: Opcode) -> u16 {
        opcode as u16
    }
}
