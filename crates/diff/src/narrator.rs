//! Per-path narration
//!
//! Walks the path index of a decoded stream and renders, for each path, one
//! short line per meaningful change. Within a path the walk carries only the
//! previous action, the pending extent runs, and the position of the last
//! timestamp line; nothing is carried across paths.

use crate::extents::ExtentAccumulator;
use crate::options::{NarrateOptions, TimeZoneMode};
use crate::temp_path::is_temporary;
use chrono::Local;
use serde::Serialize;
use snapdiff_core::{Command, Operation, Timespec};
use snapdiff_stream::{DecodedStream, PathRef, PathRole};
use tracing::debug;

/// Display name of the subvolume root
pub const SUBVOLUME_ROOT: &str = "__sub_root__";

/// Timestamp rendering format
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Action label of a synthetic lineage reference
pub const RENAMED_FROM: &str = "renamed_from";

/// Narrated changes of a whole stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narration {
    /// Stream format version
    pub version: u32,
    /// Changed paths in first-seen order
    pub paths: Vec<PathNarration>,
    /// Hidden temporary paths with unusual action sequences
    pub elided: Vec<ElidedPath>,
}

impl Narration {
    /// Narration of `path`, by display name.
    pub fn get(&self, path: &str) -> Option<&PathNarration> {
        self.paths.iter().find(|p| p.path == path)
    }
}

/// Changes of one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNarration {
    /// Display path (`__sub_root__` for the subvolume root)
    pub path: String,
    /// Rendered lines, in emission order
    pub actions: Vec<String>,
}

/// A hidden temporary path, reported raw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElidedPath {
    /// Temporary path
    pub path: String,
    /// Action labels and sequences, in emission order
    pub actions: Vec<ElidedAction>,
}

/// One raw action of an elided path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElidedAction {
    /// Opcode name, or `renamed_from` for lineage references
    pub action: &'static str,
    /// Sequence of the referenced command
    pub sequence: u64,
}

/// Narrate every path of a decoded stream.
pub fn narrate(stream: &DecodedStream, options: &NarrateOptions) -> Narration {
    let mut paths = Vec::new();
    let mut elided = Vec::new();

    for (path, refs) in stream.paths.iter() {
        if options.filter_temporary && is_temporary(path) {
            if options.debug_elided && !is_expected_idiom(stream, refs) {
                elided.push(ElidedPath {
                    path: path.to_owned(),
                    actions: refs
                        .iter()
                        .map(|r| ElidedAction {
                            action: action_label(stream, r),
                            sequence: r.sequence,
                        })
                        .collect(),
                });
            }
            continue;
        }

        paths.push(narrate_path(stream, path, refs, options));
    }

    debug!(
        paths = paths.len(),
        elided = elided.len(),
        "Narrated stream"
    );

    Narration {
        version: stream.version(),
        paths,
        elided,
    }
}

/// Narrate a single path.
pub fn narrate_path(
    stream: &DecodedStream,
    path: &str,
    refs: &[PathRef],
    options: &NarrateOptions,
) -> PathNarration {
    let mut lines: Vec<String> = Vec::new();
    let mut extents = ExtentAccumulator::new();
    let mut previous: Option<&'static str> = None;
    let mut times_line: Option<usize> = None;

    for r in refs {
        let command = stream.command(r.sequence);
        let is_extent = matches!(
            (r.role, command.map(|c| &c.op)),
            (PathRole::Primary, Some(Operation::UpdateExtent { .. }))
        );

        if !is_extent {
            if let Some(line) = extents.flush() {
                lines.push(line);
            }
        }

        match (r.role, command.map(|c| &c.op)) {
            (PathRole::RenamedFrom, Some(Operation::Rename { path: source, .. })) => {
                if options.filter_temporary && is_temporary(source) {
                    if previous == Some("unlink") {
                        lines.pop();
                        lines.push("rewritten".to_string());
                    } else {
                        lines.push("created".to_string());
                    }
                } else {
                    lines.push(format!("renamed from \"{}\"", source));
                }
            }
            (
                PathRole::Primary,
                Some(Operation::UpdateExtent {
                    offset, length, ..
                }),
            ) => extents.push(*offset, *length),
            (
                PathRole::Primary,
                Some(Operation::SetTimes {
                    atime,
                    mtime,
                    ctime,
                    ..
                }),
            ) => {
                if options.collapse_times {
                    if let Some(i) = times_line.take() {
                        lines.remove(i);
                    }
                }
                times_line = Some(lines.len());
                lines.push(format!(
                    "times a={} m={} c={}",
                    format_time(atime, options.time_zone),
                    format_time(mtime, options.time_zone),
                    format_time(ctime, options.time_zone),
                ));
            }
            (PathRole::Primary, Some(Operation::WriteData { offset, data, .. })) => {
                lines.push(format!("write: from {}", offset));
                lines.push(format!("data: {}", data.escape_ascii()));
            }
            (PathRole::Primary, Some(op)) => match render_line(op) {
                Some(line) => lines.push(line),
                None => lines.push(unexpected(r, command)),
            },
            _ => lines.push(unexpected(r, command)),
        }

        previous = Some(action_label(stream, r));
    }

    if let Some(line) = extents.flush() {
        lines.push(line);
    }

    PathNarration {
        path: display_path(path).to_owned(),
        actions: lines,
    }
}

/// Fixed-template line of a primary reference.
fn render_line(op: &Operation) -> Option<String> {
    let line = match op {
        Operation::MakeFile { .. } => "mkfile".to_string(),
        Operation::MakeDirectory { .. } => "mkdir".to_string(),
        Operation::MakeFifo { .. } => "mkfifo".to_string(),
        Operation::MakeSocket { .. } => "mksock".to_string(),
        Operation::Unlink { .. } => "unlink".to_string(),
        Operation::RemoveDirectory { .. } => "rmdir".to_string(),
        Operation::MakeDeviceNode { mode, rdev, .. } => {
            format!("mknod mode={:o} rdev={}", mode, rdev)
        }
        Operation::Truncate { size, .. } => format!("truncate {}", size),
        Operation::ChangeOwner { uid, gid, .. } => format!("owner {}:{}", uid, gid),
        Operation::ChangeMode { mode, .. } => format!("mode {:o}", mode),
        Operation::Hardlink { target, .. } => format!("link to \"{}\"", target),
        Operation::Symlink { target, .. } => format!("symlink to \"{}\"", target),
        Operation::Rename { destination, .. } => format!("rename to \"{}\"", destination),
        Operation::SnapshotCreate {
            uuid,
            ctransid,
            clone_uuid,
            clone_ctransid,
            ..
        } => format!(
            "snapshot: uuid={}, ctransid={}, clone_uuid={}, clone_ctransid={}",
            uuid.simple(),
            ctransid,
            clone_uuid.simple(),
            clone_ctransid
        ),
        Operation::SubvolumeCreate { uuid, ctransid, .. } => {
            format!("subvol: uuid={}, ctransid={}", uuid.simple(), ctransid)
        }
        Operation::SetXattr { name, data, .. } => {
            format!("xattr {} = \"{}\"", name, data.escape_ascii())
        }
        Operation::RemoveXattr { name, .. } => format!("remove xattr {}", name),
        Operation::CloneRange {
            offset,
            length,
            source_path,
            source_offset,
            ..
        } => format!(
            "clone {} bytes at {} from \"{}\" at {}",
            length, offset, source_path, source_offset
        ),
        Operation::WriteData { .. }
        | Operation::SetTimes { .. }
        | Operation::UpdateExtent { .. }
        | Operation::End { .. }
        | Operation::Unspecified => return None,
    };
    Some(line)
}

fn unexpected(r: &PathRef, command: Option<&Command>) -> String {
    let opcode = command.map(|c| c.opcode().name()).unwrap_or("missing");
    format!("unexpected {} {} #{}", r.role, opcode, r.sequence)
}

fn action_label(stream: &DecodedStream, r: &PathRef) -> &'static str {
    match r.role {
        PathRole::RenamedFrom => RENAMED_FROM,
        PathRole::Primary => stream
            .command(r.sequence)
            .map(|c| c.opcode().name())
            .unwrap_or("missing"),
    }
}

/// Whether a temporary path shows only the usual send-tool idiom: created
/// then renamed into place, or renamed away then removed.
fn is_expected_idiom(stream: &DecodedStream, refs: &[PathRef]) -> bool {
    let labels: Vec<&str> = refs.iter().map(|r| action_label(stream, r)).collect();
    matches!(
        labels.as_slice(),
        ["mkfile" | "mkdir" | "symlink", "rename"] | [RENAMED_FROM, "rmdir"]
    )
}

/// Display name of a path.
pub fn display_path(path: &str) -> &str {
    if path.is_empty() {
        SUBVOLUME_ROOT
    } else {
        path
    }
}

/// Render a timestamp with [`TIME_FORMAT`] in the given zone.
///
/// Out-of-range values fall back to the raw `secs.nanos` form.
pub fn format_time(time: &Timespec, zone: TimeZoneMode) -> String {
    match time.to_datetime() {
        Some(utc) => match zone {
            TimeZoneMode::Utc => utc.format(TIME_FORMAT).to_string(),
            TimeZoneMode::Local => utc.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        },
        None => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapdiff_stream::testing::StreamBuilder;
    use snapdiff_stream::{decode, DecodeOptions};
    use uuid::Uuid;

    fn decoded(ops: &[Operation], lineage: bool) -> DecodedStream {
        let buf = ops
            .iter()
            .fold(StreamBuilder::new(1), |b, op| b.command(op))
            .end()
            .build();
        decode(&buf, &DecodeOptions::new().with_lineage(lineage)).unwrap()
    }

    fn lines<'a>(narration: &'a Narration, path: &str) -> Vec<&'a str> {
        narration
            .get(path)
            .unwrap_or_else(|| panic!("no narration for {}", path))
            .actions
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn extent(path: &str, offset: u64, length: u64) -> Operation {
        Operation::UpdateExtent {
            path: path.to_string(),
            offset,
            length,
        }
    }

    fn times(path: &str, secs: u64) -> Operation {
        let t = Timespec::new(secs, 0);
        Operation::SetTimes {
            path: path.to_string(),
            atime: t,
            mtime: t,
            ctime: t,
        }
    }

    #[test]
    fn test_extents_coalesce() {
        let stream = decoded(&[extent("f", 0, 100), extent("f", 100, 50)], false);
        let narration = narrate(&stream, &NarrateOptions::default());
        assert_eq!(lines(&narration, "f"), vec!["update extents 0 -> 150"]);
    }

    #[test]
    fn test_extents_flush_before_other_action_and_reset() {
        let stream = decoded(
            &[
                extent("f", 0, 10),
                Operation::Truncate {
                    path: "f".to_string(),
                    size: 10,
                },
                extent("f", 4096, 4096),
                extent("f", 8192, 4096),
            ],
            false,
        );
        let narration = narrate(&stream, &NarrateOptions::default());
        assert_eq!(
            lines(&narration, "f"),
            vec![
                "update extents 0 -> 10",
                "truncate 10",
                "update extents 4096 -> 12288",
            ]
        );
    }

    #[test]
    fn test_times_collapse_keeps_latest() {
        let ops = [
            times("f", 0),
            Operation::ChangeMode {
                path: "f".to_string(),
                mode: 0o644,
            },
            times("f", 86_400),
        ];
        let stream = decoded(&ops, false);

        let all = narrate(&stream, &NarrateOptions::default());
        assert_eq!(
            lines(&all, "f"),
            vec![
                "times a=1970/01/01 00:00:00 m=1970/01/01 00:00:00 c=1970/01/01 00:00:00",
                "mode 644",
                "times a=1970/01/02 00:00:00 m=1970/01/02 00:00:00 c=1970/01/02 00:00:00",
            ]
        );

        let collapsed = narrate(&stream, &NarrateOptions::new().with_collapse_times(true));
        assert_eq!(
            lines(&collapsed, "f"),
            vec![
                "mode 644",
                "times a=1970/01/02 00:00:00 m=1970/01/02 00:00:00 c=1970/01/02 00:00:00",
            ]
        );
    }

    #[test]
    fn test_created_from_temporary() {
        let ops = [
            Operation::MakeFile {
                path: "o257-5-0".to_string(),
            },
            Operation::Rename {
                path: "o257-5-0".to_string(),
                destination: "a.txt".to_string(),
            },
        ];
        let stream = decoded(&ops, true);

        let filtered = narrate(&stream, &NarrateOptions::heuristic());
        assert!(filtered.get("o257-5-0").is_none());
        assert_eq!(lines(&filtered, "a.txt"), vec!["created"]);

        let raw = narrate(&stream, &NarrateOptions::default());
        assert_eq!(lines(&raw, "o257-5-0"), vec!["mkfile", "rename to \"a.txt\""]);
        assert_eq!(lines(&raw, "a.txt"), vec!["renamed from \"o257-5-0\""]);
    }

    #[test]
    fn test_rewritten_replaces_unlink() {
        let ops = [
            Operation::Unlink {
                path: "a.txt".to_string(),
            },
            Operation::MakeFile {
                path: "o300-1-0".to_string(),
            },
            Operation::Rename {
                path: "o300-1-0".to_string(),
                destination: "a.txt".to_string(),
            },
        ];
        let stream = decoded(&ops, true);
        let narration = narrate(&stream, &NarrateOptions::heuristic());
        assert_eq!(lines(&narration, "a.txt"), vec!["rewritten"]);
    }

    #[test]
    fn test_elided_debug_reports_unusual_sequences() {
        let ops = [
            Operation::MakeFile {
                path: "o1-1-0".to_string(),
            },
            Operation::Rename {
                path: "o1-1-0".to_string(),
                destination: "x".to_string(),
            },
            Operation::MakeDirectory {
                path: "o2-1-0".to_string(),
            },
            Operation::ChangeMode {
                path: "o2-1-0".to_string(),
                mode: 0o700,
            },
        ];
        let stream = decoded(&ops, true);
        let options = NarrateOptions::heuristic().with_debug_elided(true);
        let narration = narrate(&stream, &options);

        assert!(narration.get("o1-1-0").is_none());
        assert!(narration.get("o2-1-0").is_none());
        assert_eq!(
            narration.elided,
            vec![ElidedPath {
                path: "o2-1-0".to_string(),
                actions: vec![
                    ElidedAction {
                        action: "mkdir",
                        sequence: 2,
                    },
                    ElidedAction {
                        action: "chmod",
                        sequence: 3,
                    },
                ],
            }]
        );

        let quiet = narrate(&stream, &NarrateOptions::heuristic());
        assert!(quiet.elided.is_empty());
    }

    #[test]
    fn test_elided_debug_accepts_remove_idiom() {
        let ops = [
            Operation::Rename {
                path: "olddir".to_string(),
                destination: "o9-1-0".to_string(),
            },
            Operation::RemoveDirectory {
                path: "o9-1-0".to_string(),
            },
        ];
        let stream = decoded(&ops, true);
        let narration = narrate(&stream, &NarrateOptions::heuristic().with_debug_elided(true));

        assert!(narration.get("o9-1-0").is_none());
        assert!(narration.elided.is_empty());
        assert_eq!(lines(&narration, "olddir"), vec!["rename to \"o9-1-0\""]);
    }

    #[test]
    fn test_elided_debug_accepts_symlink_then_rename() {
        let ops = [
            Operation::Symlink {
                path: "o4-2-0".to_string(),
                inode: 4,
                target: "../lib".to_string(),
            },
            Operation::Rename {
                path: "o4-2-0".to_string(),
                destination: "lib".to_string(),
            },
        ];
        let stream = decoded(&ops, true);
        let narration = narrate(&stream, &NarrateOptions::heuristic().with_debug_elided(true));

        assert!(narration.get("o4-2-0").is_none());
        assert!(narration.elided.is_empty());
        assert_eq!(lines(&narration, "lib"), vec!["created"]);
    }

    #[test]
    fn test_subvolume_root_display() {
        let stream = decoded(
            &[Operation::ChangeOwner {
                path: String::new(),
                uid: 0,
                gid: 0,
            }],
            false,
        );
        let narration = narrate(&stream, &NarrateOptions::default());
        assert_eq!(lines(&narration, SUBVOLUME_ROOT), vec!["owner 0:0"]);
    }

    #[test]
    fn test_fixed_templates() {
        let ops = [
            Operation::SnapshotCreate {
                path: "snap".to_string(),
                uuid: Uuid::from_bytes([0xAA; 16]),
                ctransid: 5,
                clone_uuid: Uuid::from_bytes([0xBB; 16]),
                clone_ctransid: 4,
            },
            Operation::MakeDeviceNode {
                path: "dev".to_string(),
                mode: 0o20644,
                rdev: 1283,
            },
            Operation::Hardlink {
                path: "h".to_string(),
                target: "dev".to_string(),
            },
            Operation::SetXattr {
                path: "h".to_string(),
                name: "user.note".to_string(),
                data: b"a\"b\n".to_vec(),
            },
            Operation::RemoveXattr {
                path: "h".to_string(),
                name: "user.old".to_string(),
            },
            Operation::WriteData {
                path: "w".to_string(),
                offset: 8,
                data: b"hi\x00".to_vec(),
            },
        ];
        let stream = decoded(&ops, false);
        let narration = narrate(&stream, &NarrateOptions::default());

        assert_eq!(
            lines(&narration, "snap"),
            vec![format!(
                "snapshot: uuid={}, ctransid=5, clone_uuid={}, clone_ctransid=4",
                "aa".repeat(16),
                "bb".repeat(16)
            )]
        );
        assert_eq!(lines(&narration, "dev"), vec!["mknod mode=20644 rdev=1283"]);
        assert_eq!(
            lines(&narration, "h"),
            vec![
                "link to \"dev\"",
                "xattr user.note = \"a\\\"b\\n\"",
                "remove xattr user.old",
            ]
        );
        assert_eq!(
            lines(&narration, "w"),
            vec!["write: from 8", "data: hi\\x00"]
        );
    }

    #[test]
    fn test_format_time_utc() {
        assert_eq!(
            format_time(&Timespec::new(1_700_000_000, 5), TimeZoneMode::Utc),
            "2023/11/14 22:13:20"
        );
        assert_eq!(
            format_time(&Timespec::new(u64::MAX, 0), TimeZoneMode::Utc),
            Timespec::new(u64::MAX, 0).to_string()
        );
    }
}
