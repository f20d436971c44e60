//! Value types carried by decoded commands
//!
//! ## Timespec
//!
//! Stream timestamps are a `u64` seconds field plus a `u32` nanoseconds
//! field. They are kept as integers end to end; converting through `f64`
//! would lose nanosecond precision for any date after the 1970s.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Nanosecond-precision timestamp as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Timespec {
    /// Seconds since Unix epoch
    pub secs: u64,
    /// Nanoseconds within the second
    pub nanos: u32,
}

impl Timespec {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timespec = Timespec { secs: 0, nanos: 0 };

    /// Create a timespec from its wire fields
    #[inline]
    pub const fn new(secs: u64, nanos: u32) -> Self {
        Timespec { secs, nanos }
    }

    /// Total nanoseconds since Unix epoch
    ///
    /// Uses `u128` so every wire value is representable.
    #[inline]
    pub const fn as_nanos(&self) -> u128 {
        self.secs as u128 * 1_000_000_000 + self.nanos as u128
    }

    /// Convert to a UTC date-time
    ///
    /// Returns `None` if the seconds field is beyond chrono's range or the
    /// nanoseconds field is not a valid sub-second value.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.secs).ok()?;
        DateTime::<Utc>::from_timestamp(secs, self.nanos)
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}
