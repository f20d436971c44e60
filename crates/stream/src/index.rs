//! Per-path command index
//!
//! Groups command references by the path they touch, preserving the order in
//! which paths were first seen and, within a path, emission order. Entries
//! refer to commands by sequence index; the commands themselves live in the
//! flat list of [`DecodedStream`](crate::DecodedStream).

use indexmap::IndexMap;
use serde::Serialize;
use snapdiff_core::{Command, Operation};
use std::fmt;

/// How a command relates to the path it is indexed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathRole {
    /// The path is the command's own primary path
    Primary,
    /// The path is the destination of a rename; the command's primary path
    /// is the rename source
    RenamedFrom,
}

impl PathRole {
    /// Short name, as used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            PathRole::Primary => "primary",
            PathRole::RenamedFrom => "renamed_from",
        }
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to one command from a path entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PathRef {
    /// Sequence index of the referenced command
    pub sequence: u64,
    /// Relation between command and path
    pub role: PathRole,
}

impl PathRef {
    /// Reference under the command's own path
    pub fn primary(sequence: u64) -> Self {
        PathRef {
            sequence,
            role: PathRole::Primary,
        }
    }

    /// Synthetic reference under a rename destination
    pub fn renamed_from(sequence: u64) -> Self {
        PathRef {
            sequence,
            role: PathRole::RenamedFrom,
        }
    }
}

/// Ordered map from path to the commands touching it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathIndex {
    entries: IndexMap<String, Vec<PathRef>>,
}

impl PathIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a complete command list.
    pub fn build(commands: &[Command], synthesize_lineage: bool) -> Self {
        let mut index = PathIndex::new();
        for command in commands {
            index.record(command, synthesize_lineage);
        }
        index
    }

    /// Add one command.
    ///
    /// The terminal and placeholder commands carry no path and are skipped.
    /// With `synthesize_lineage`, a rename also adds a `RenamedFrom`
    /// reference under its destination, ahead of the primary reference under
    /// its source.
    pub fn record(&mut self, command: &Command, synthesize_lineage: bool) {
        let Some(path) = command.path() else {
            return;
        };

        if synthesize_lineage {
            if let Operation::Rename { destination, .. } = &command.op {
                self.push(destination, PathRef::renamed_from(command.sequence));
            }
        }

        self.push(path, PathRef::primary(command.sequence));
    }

    fn push(&mut self, path: &str, entry: PathRef) {
        match self.entries.get_mut(path) {
            Some(refs) => refs.push(entry),
            None => {
                self.entries.insert(path.to_owned(), vec![entry]);
            }
        }
    }

    /// References recorded for `path`, in emission order.
    pub fn get(&self, path: &str) -> Option<&[PathRef]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Whether `path` was touched by any command.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathRef])> {
        self.entries
            .iter()
            .map(|(path, refs)| (path.as_str(), refs.as_slice()))
    }

    /// Paths in first-seen order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of references across all paths.
    pub fn ref_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
