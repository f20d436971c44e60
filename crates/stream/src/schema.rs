//! Per-opcode attribute schema table
//!
//! Each entry lists, in wire order, the attribute tags a command carries and
//! how each payload is decoded. The decoder walks the list strictly: the
//! first attribute whose tag differs from the table aborts the decode.
//! Attributes trailing the listed ones are ignored.

use crate::options::CloneLayout;
use crate::tlv::AttrShape;
use snapdiff_core::{AttrTag, Opcode};

/// Where an attribute read starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOrigin {
    /// Right after the previous attribute
    Cursor,
    /// At the start of the frame body, regardless of what was read before
    BodyStart,
}

/// One schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    /// Expected tag
    pub tag: AttrTag,
    /// Payload decoding
    pub shape: AttrShape,
    /// Read origin
    pub origin: AttrOrigin,
}

const fn attr(tag: AttrTag, shape: AttrShape) -> AttrSpec {
    AttrSpec {
        tag,
        shape,
        origin: AttrOrigin::Cursor,
    }
}

const fn rebased(tag: AttrTag, shape: AttrShape) -> AttrSpec {
    AttrSpec {
        tag,
        shape,
        origin: AttrOrigin::BodyStart,
    }
}

const PATH: AttrSpec = attr(AttrTag::Path, AttrShape::String);

static NONE: [AttrSpec; 0] = [];
static PATH_ONLY: [AttrSpec; 1] = [PATH];

static SUBVOLUME_CREATE: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::Uuid, AttrShape::Uuid),
    attr(AttrTag::Ctransid, AttrShape::U64),
];

static SNAPSHOT_CREATE: [AttrSpec; 5] = [
    PATH,
    attr(AttrTag::Uuid, AttrShape::Uuid),
    attr(AttrTag::Ctransid, AttrShape::U64),
    attr(AttrTag::CloneUuid, AttrShape::Uuid),
    attr(AttrTag::CloneCtransid, AttrShape::U64),
];

static MAKE_DEVICE_NODE: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::Mode, AttrShape::U64),
    attr(AttrTag::Rdev, AttrShape::U64),
];

static MAKE_SPECIAL: [AttrSpec; 4] = [
    PATH,
    attr(AttrTag::Ino, AttrShape::U64),
    attr(AttrTag::Mode, AttrShape::U64),
    attr(AttrTag::Rdev, AttrShape::U64),
];

static SYMLINK: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::Ino, AttrShape::U64),
    attr(AttrTag::PathLink, AttrShape::String),
];

static RENAME: [AttrSpec; 2] = [PATH, attr(AttrTag::PathTo, AttrShape::String)];

static HARDLINK: [AttrSpec; 2] = [PATH, attr(AttrTag::PathLink, AttrShape::String)];

static SET_XATTR: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::XattrName, AttrShape::String),
    attr(AttrTag::XattrData, AttrShape::Bytes),
];

static REMOVE_XATTR: [AttrSpec; 2] = [PATH, attr(AttrTag::XattrName, AttrShape::String)];

static WRITE_DATA: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::FileOffset, AttrShape::U64),
    attr(AttrTag::Data, AttrShape::Bytes),
];

static CLONE_RANGE_OBSERVED: [AttrSpec; 7] = [
    PATH,
    attr(AttrTag::FileOffset, AttrShape::U64),
    attr(AttrTag::CloneLen, AttrShape::U64),
    attr(AttrTag::CloneUuid, AttrShape::Uuid),
    attr(AttrTag::CloneCtransid, AttrShape::U64),
    rebased(AttrTag::ClonePath, AttrShape::String),
    attr(AttrTag::CloneOffset, AttrShape::U64),
];

static CLONE_RANGE_SEQUENTIAL: [AttrSpec; 7] = [
    PATH,
    attr(AttrTag::FileOffset, AttrShape::U64),
    attr(AttrTag::CloneLen, AttrShape::U64),
    attr(AttrTag::CloneUuid, AttrShape::Uuid),
    attr(AttrTag::CloneCtransid, AttrShape::U64),
    attr(AttrTag::ClonePath, AttrShape::String),
    attr(AttrTag::CloneOffset, AttrShape::U64),
];

static TRUNCATE: [AttrSpec; 2] = [PATH, attr(AttrTag::Size, AttrShape::U64)];

static CHANGE_MODE: [AttrSpec; 2] = [PATH, attr(AttrTag::Mode, AttrShape::U64)];

static CHANGE_OWNER: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::Uid, AttrShape::U64),
    attr(AttrTag::Gid, AttrShape::U64),
];

static SET_TIMES: [AttrSpec; 4] = [
    PATH,
    attr(AttrTag::Atime, AttrShape::Timespec),
    attr(AttrTag::Mtime, AttrShape::Timespec),
    attr(AttrTag::Ctime, AttrShape::Timespec),
];

static UPDATE_EXTENT: [AttrSpec; 3] = [
    PATH,
    attr(AttrTag::FileOffset, AttrShape::U64),
    attr(AttrTag::Size, AttrShape::U64),
];

/// Attribute schema for `opcode`.
pub fn schema(opcode: Opcode, clone_layout: CloneLayout) -> &'static [AttrSpec] {
    match opcode {
        Opcode::Unspecified | Opcode::End => &NONE,
        Opcode::SubvolumeCreate => &SUBVOLUME_CREATE,
        Opcode::SnapshotCreate => &SNAPSHOT_CREATE,
        Opcode::MakeFile | Opcode::MakeDirectory | Opcode::Unlink | Opcode::RemoveDirectory => {
            &PATH_ONLY
        }
        Opcode::MakeDeviceNode => &MAKE_DEVICE_NODE,
        Opcode::MakeFifo | Opcode::MakeSocket => &MAKE_SPECIAL,
        Opcode::Symlink => &SYMLINK,
        Opcode::Rename => &RENAME,
        Opcode::Hardlink => &HARDLINK,
        Opcode::SetXattr => &SET_XATTR,
        Opcode::RemoveXattr => &REMOVE_XATTR,
        Opcode::WriteData => &WRITE_DATA,
        Opcode::CloneRange => match clone_layout {
            CloneLayout::Observed => &CLONE_RANGE_OBSERVED,
            CloneLayout::Sequential => &CLONE_RANGE_SEQUENTIAL,
        },
        Opcode::Truncate => &TRUNCATE,
        Opcode::ChangeMode => &CHANGE_MODE,
        Opcode::ChangeOwner => &CHANGE_OWNER,
        Opcode::SetTimes => &SET_TIMES,
        Opcode::UpdateExtent => &UPDATE_EXTENT,
    }
}
