//! Extent run accumulation
//!
//! Consecutive extent updates on one path collapse into a single line
//! spanning from the first run's offset to the end of the last run.

use serde::Serialize;

/// One updated extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtentRun {
    /// Start offset
    pub offset: u64,
    /// Length in bytes
    pub length: u64,
}

impl ExtentRun {
    /// Offset one past the run. Wider than `u64` so no wire value overflows.
    pub fn end(&self) -> u128 {
        u128::from(self.offset) + u128::from(self.length)
    }
}

/// Pending runs for the path being narrated
#[derive(Debug, Clone, Default)]
pub struct ExtentAccumulator {
    runs: Vec<ExtentRun>,
}

impl ExtentAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run.
    pub fn push(&mut self, offset: u64, length: u64) {
        self.runs.push(ExtentRun { offset, length });
    }

    /// Whether no run is pending.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of pending runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// `(first offset, end of last run)` of the pending runs.
    pub fn span(&self) -> Option<(u64, u128)> {
        let first = self.runs.first()?;
        let last = self.runs.last()?;
        Some((first.offset, last.end()))
    }

    /// Render the pending runs as one line and clear them.
    pub fn flush(&mut self) -> Option<String> {
        let line = self
            .span()
            .map(|(start, end)| format!("update extents {} -> {}", start, end));
        self.runs.clear();
        line
    }
}
