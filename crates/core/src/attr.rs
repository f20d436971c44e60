//! Attribute tag registry
//!
//! Tags are 16-bit values on the wire. Each command schema lists the tags it
//! expects in order; decoding is positional, never a key lookup.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Attribute tags with explicit wire values
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrTag {
    /// Unused placeholder (0)
    Unspec = 0,
    /// Subvolume UUID
    Uuid = 1,
    /// Subvolume change transaction id
    Ctransid = 2,
    /// Inode number
    Ino = 3,
    /// Size in bytes
    Size = 4,
    /// Mode bits
    Mode = 5,
    /// Owner user id
    Uid = 6,
    /// Owner group id
    Gid = 7,
    /// Device number
    Rdev = 8,
    /// Change time
    Ctime = 9,
    /// Modification time
    Mtime = 10,
    /// Access time
    Atime = 11,
    /// Creation time
    Otime = 12,
    /// Extended attribute name
    XattrName = 13,
    /// Extended attribute value
    XattrData = 14,
    /// Primary path
    Path = 15,
    /// Rename destination
    PathTo = 16,
    /// Link target
    PathLink = 17,
    /// Offset within the file
    FileOffset = 18,
    /// File content payload
    Data = 19,
    /// Clone source subvolume UUID
    CloneUuid = 20,
    /// Clone source transaction id
    CloneCtransid = 21,
    /// Clone source path
    ClonePath = 22,
    /// Clone source offset
    CloneOffset = 23,
    /// Clone length
    CloneLen = 24,
}

impl AttrTag {
    /// Number of entries in the tag table
    pub const COUNT: usize = 25;

    /// Short lowercase name of the tag
    pub fn name(&self) -> &'static str {
        match self {
            AttrTag::Unspec => "unspec",
            AttrTag::Uuid => "uuid",
            AttrTag::Ctransid => "ctransid",
            AttrTag::Ino => "ino",
            AttrTag::Size => "size",
            AttrTag::Mode => "mode",
            AttrTag::Uid => "uid",
            AttrTag::Gid => "gid",
            AttrTag::Rdev => "rdev",
            AttrTag::Ctime => "ctime",
            AttrTag::Mtime => "mtime",
            AttrTag::Atime => "atime",
            AttrTag::Otime => "otime",
            AttrTag::XattrName => "xattr_name",
            AttrTag::XattrData => "xattr_data",
            AttrTag::Path => "path",
            AttrTag::PathTo => "path_to",
            AttrTag::PathLink => "path_link",
            AttrTag::FileOffset => "file_offset",
            AttrTag::Data => "data",
            AttrTag::CloneUuid => "clone_uuid",
            AttrTag::CloneCtransid => "clone_ctransid",
            AttrTag::ClonePath => "clone_path",
            AttrTag::CloneOffset => "clone_offset",
            AttrTag::CloneLen => "clone_len",
        }
    }

    /// Name of a raw tag value, or `#<value>` when it is not in the table
    pub fn describe(value: u16) -> String {
        match AttrTag::try_from(value) {
            Ok(tag) => tag.name().to_string(),
            Err(_) => format!("#{}", value),
        }
    }
}

impl fmt::Display for AttrTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error when parsing an attribute tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown attribute tag: {0}")]
pub struct UnknownAttrTag(pub u16);

impl TryFrom<u16> for AttrTag {
    type Error = UnknownAttrTag;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let tag = match value {
            0 => AttrTag::Unspec,
            1 => AttrTag::Uuid,
            2 => AttrTag::Ctransid,
            3 => AttrTag::Ino,
            4 => AttrTag::Size,
            5 => AttrTag::Mode,
            6 => AttrTag::Uid,
            7 => AttrTag::Gid,
            8 => AttrTag::Rdev,
            9 => AttrTag::Ctime,
            10 => AttrTag::Mtime,
            11 => AttrTag::Atime,
            12 => AttrTag::Otime,
            13 => AttrTag::XattrName,
            14 => AttrTag::XattrData,
            15 => AttrTag::Path,
            16 => AttrTag::PathTo,
            17 => AttrTag::PathLink,
            18 => AttrTag::FileOffset,
            19 => AttrTag::Data,
            20 => AttrTag::CloneUuid,
            21 => AttrTag::CloneCtransid,
            22 => AttrTag::ClonePath,
            23 => AttrTag::CloneOffset,
            24 => AttrTag::CloneLen,
            other => return Err(UnknownAttrTag(other)),
        };
        Ok(tag)
    }
}

impl From<AttrTag> for u16 {
    fn from(tag: AttrTag) -> u16 {
        tag as u16
    }
}
