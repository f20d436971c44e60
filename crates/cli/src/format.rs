//! Narration and command → human/csv/json string formatting.
//!
//! Three modes:
//! - **Human** (default): blank line, path, then one tab-indented line per change
//! - **Csv** (`--csv`): `path;line;line` one record per path
//! - **Json** (`--json`): `serde_json::to_string_pretty`

use snapdiff_core::{Command, Operation};
use snapdiff_diff::{ElidedPath, Narration};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Csv,
    Json,
}

/// Width of the opcode column in dumps
const OPCODE_COLUMN: usize = 14;

/// Format a narration.
pub fn format_narration(narration: &Narration, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(narration),
        OutputMode::Csv => format_csv(narration),
        OutputMode::Human => format_human(narration),
    }
}

fn format_human(narration: &Narration) -> String {
    let mut out = String::new();
    for entry in &narration.paths {
        out.push('\n');
        out.push_str(&entry.path);
        out.push('\n');
        for line in &entry.actions {
            out.push('\t');
            out.push_str(line);
            out.push('\n');
        }
    }
    for elided in &narration.elided {
        out.push_str(&format_elided(elided));
    }
    out
}

fn format_elided(elided: &ElidedPath) -> String {
    let actions: Vec<String> = elided
        .actions
        .iter()
        .map(|a| format!("{}#{}", a.action, a.sequence))
        .collect();
    format!(
        "{}\n\t[{}] {}\n",
        elided.path,
        actions.join(", "),
        "=".repeat(20)
    )
}

fn format_csv(narration: &Narration) -> String {
    let mut out = String::new();
    for entry in &narration.paths {
        out.push_str(&entry.path);
        for line in &entry.actions {
            out.push(';');
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Format a decoded command list as a dump.
///
/// The closing count leaves out the end command itself.
pub fn format_dump(commands: &[Command], json: bool) -> String {
    if json {
        return format_json(&commands);
    }

    let mut out = String::new();
    for command in commands {
        if let Operation::End {
            end_offset,
            stream_length,
        } = &command.op
        {
            out.push_str(&format!(
                "END: {} commands done ({} = {} ?)\n",
                commands.len().saturating_sub(1),
                end_offset,
                stream_length
            ));
            break;
        }
        out.push_str(&format!(
            "{:<width$} {}\n",
            command.opcode().name().to_uppercase(),
            dump_fields(&command.op).join(", "),
            width = OPCODE_COLUMN
        ));
    }
    out
}

/// Field values of one command, in wire order. Payloads show as byte counts.
fn dump_fields(op: &Operation) -> Vec<String> {
    match op {
        Operation::SubvolumeCreate {
            path,
            uuid,
            ctransid,
        } => vec![path.clone(), uuid.simple().to_string(), ctransid.to_string()],
        Operation::SnapshotCreate {
            path,
            uuid,
            ctransid,
            clone_uuid,
            clone_ctransid,
        } => vec![
            path.clone(),
            uuid.simple().to_string(),
            ctransid.to_string(),
            clone_uuid.simple().to_string(),
            clone_ctransid.to_string(),
        ],
        Operation::MakeFile { path }
        | Operation::MakeDirectory { path }
        | Operation::Unlink { path }
        | Operation::RemoveDirectory { path } => vec![path.clone()],
        Operation::MakeDeviceNode { path, mode, rdev } => {
            vec![path.clone(), mode.to_string(), rdev.to_string()]
        }
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
            path.clone(),
            inode.to_string(),
            mode.to_string(),
            rdev.to_string(),
        ],
        Operation::Symlink {
            path,
            inode,
            target,
        } => vec![path.clone(), inode.to_string(), target.clone()],
        Operation::Rename { path, destination } => vec![path.clone(), destination.clone()],
        Operation::Hardlink { path, target } => vec![path.clone(), target.clone()],
        Operation::SetXattr { path, name, data } => {
            vec![path.clone(), name.clone(), format!("{} bytes", data.len())]
        }
        Operation::RemoveXattr { path, name } => vec![path.clone(), name.clone()],
        Operation::WriteData { path, offset, data } => vec![
            path.clone(),
            offset.to_string(),
            format!("{} bytes", data.len()),
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
            path.clone(),
            offset.to_string(),
            length.to_string(),
            source_uuid.simple().to_string(),
            source_ctransid.to_string(),
            source_path.clone(),
            source_offset.to_string(),
        ],
        Operation::Truncate { path, size } => vec![path.clone(), size.to_string()],
        Operation::ChangeMode { path, mode } => vec![path.clone(), mode.to_string()],
        Operation::ChangeOwner { path, uid, gid } => {
            vec![path.clone(), uid.to_string(), gid.to_string()]
        }
        Operation::SetTimes {
            path,
            atime,
            mtime,
            ctime,
        } => vec![
            path.clone(),
            atime.to_string(),
            mtime.to_string(),
            ctime.to_string(),
        ],
        Operation::UpdateExtent {
            path,
            offset,
            length,
        } => vec![path.clone(), offset.to_string(), length.to_string()],
        Operation::End { .. } | Operation::Unspecified => Vec::new(),
    }
}
