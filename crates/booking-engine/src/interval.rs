//! Half-open time intervals and the overlap primitive.
//!
//! Every interval is `[start, end)`: it includes its start instant and excludes its
//! end instant. Two intervals that merely touch (one ends exactly when the other
//! starts) do NOT overlap. Identical intervals do.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// A half-open `[start, end)` window of absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting empty or inverted windows.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidInterval` if `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(BookingError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// True if `start < end`. Intervals built through [`TimeInterval::new`] always are.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn overlap_range(&self, other: &TimeInterval) -> Option<TimeInterval> {
        overlap_range(self.start, self.end, other.start, other.end)
    }

    /// True if `other` lies entirely within `self`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if both bounds fall on the same UTC calendar date.
    pub fn is_single_day(&self) -> bool {
        self.is_single_day_in(&Utc)
    }

    /// True if both bounds fall on the same calendar date in `tz`.
    ///
    /// Compares the end instant itself, so a window ending exactly at midnight
    /// spans two dates.
    pub fn is_single_day_in<Tz: TimeZone>(&self, tz: &Tz) -> bool {
        self.start.with_timezone(tz).date_naive() == self.end.with_timezone(tz).date_naive()
    }
}

/// Do `[start_a, end_a)` and `[start_b, end_b)` share at least one instant?
///
/// Two intervals overlap iff `start_a < end_b && end_a > start_b`, which excludes
/// the adjacent case `end_a == start_b`. Callers are expected to pass valid
/// intervals; degenerate inputs never panic.
pub fn overlaps(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> bool {
    start_a < end_b && end_a > start_b
}

/// The shared sub-interval `[max(starts), min(ends))`, or `None` when the inputs
/// do not overlap.
pub fn overlap_range(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> Option<TimeInterval> {
    if !overlaps(start_a, end_a, start_b, end_b) {
        return None;
    }

    let start = start_a.max(start_b);
    let end = end_a.min(end_b);

    // A degenerate operand can satisfy `overlaps` while leaving nothing shared.
    if start >= end {
        return None;
    }

    Some(TimeInterval { start, end })
}

/// Parse a timestamp into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g., "2024-07-24T08:00:00Z", "2024-07-24T10:00:00+02:00") and
/// naive datetimes (e.g., "2024-07-24T08:00:00" or the form-field style
/// "2024-07-24T08:00"), which are interpreted as UTC.
///
/// # Errors
/// Returns `BookingError::InvalidTimestamp` if none of the formats match.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ndt.and_utc());
        }
    }
    Err(BookingError::InvalidTimestamp(format!(
        "'{}' is not an RFC 3339 or YYYY-MM-DDTHH:MM[:SS] datetime",
        s
    )))
}
