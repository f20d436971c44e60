//! Narrator configuration.

use thiserror::Error;

/// Time zone used to render timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneMode {
    /// Coordinated universal time
    #[default]
    Utc,
    /// The host's local time zone
    Local,
}

/// Narrator configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrateOptions {
    /// Hide temporary orphan paths and fold their renames into
    /// `created`/`rewritten` (default: off).
    pub filter_temporary: bool,

    /// Keep only the latest timestamp line per path (default: off).
    pub collapse_times: bool,

    /// Report hidden temporary paths whose actions do not follow the usual
    /// create-then-rename pattern (default: off). Requires `filter_temporary`.
    pub debug_elided: bool,

    /// Time zone for timestamp lines (default: UTC).
    pub time_zone: TimeZoneMode,
}

impl NarrateOptions {
    /// Create narrator options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options enabling every heuristic: temporary path filtering and
    /// timestamp collapsing.
    pub fn heuristic() -> Self {
        NarrateOptions {
            filter_temporary: true,
            collapse_times: true,
            ..Self::default()
        }
    }

    /// Set temporary path filtering (builder pattern).
    pub fn with_filter_temporary(mut self, enabled: bool) -> Self {
        self.filter_temporary = enabled;
        self
    }

    /// Set timestamp collapsing (builder pattern).
    pub fn with_collapse_times(mut self, enabled: bool) -> Self {
        self.collapse_times = enabled;
        self
    }

    /// Set reporting of unusual hidden paths (builder pattern).
    pub fn with_debug_elided(mut self, enabled: bool) -> Self {
        self.debug_elided = enabled;
        self
    }

    /// Set the time zone (builder pattern).
    pub fn with_time_zone(mut self, time_zone: TimeZoneMode) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.debug_elided && !self.filter_temporary {
            return Err(OptionsError::DebugWithoutFilter);
        }
        Ok(())
    }
}

/// Narrator configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// Elided path reporting needs paths to be elided in the first place.
    #[error("Reporting elided paths requires temporary path filtering")]
    DebugWithoutFilter,
}
