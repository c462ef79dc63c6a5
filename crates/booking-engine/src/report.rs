//! User-facing conflict messages.
//!
//! Times render in the en-US short style operators see in the scheduling UI,
//! e.g. `Jul 24, 8:00 AM - 4:00 PM`. A range that starts and ends on the same
//! calendar day omits the date from the end bound.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::conflict::ConflictReport;
use crate::interval::TimeInterval;

const DATE_TIME_FORMAT: &str = "%b %-d, %-I:%M %p";
const TIME_FORMAT: &str = "%-I:%M %p";

/// Render `[start, end)` in UTC.
pub fn format_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format_time_range_in(start, end, &Utc)
}

/// Render `[start, end)` in `tz`. The same-day rule is evaluated in `tz` too.
pub fn format_time_range_in<Tz>(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let single_day = TimeInterval { start, end }.is_single_day_in(tz);
    let start = start.with_timezone(tz);
    let end = end.with_timezone(tz);

    let start_str = start.format(DATE_TIME_FORMAT);
    if single_day {
        format!("{} - {}", start_str, end.format(TIME_FORMAT))
    } else {
        format!("{} - {}", start_str, end.format(DATE_TIME_FORMAT))
    }
}

/// The primary conflict message, rendered in UTC.
///
/// - No conflicts: empty string. Check [`ConflictReport::has_conflicts`] rather
///   than relying on this.
/// - One conflict: names the colliding product and its full reservation window.
/// - More: a count-based summary without per-item detail.
pub fn format_message(report: &ConflictReport) -> String {
    format_message_in(report, &Utc)
}

/// [`format_message`] with times rendered in `tz`.
pub fn format_message_in<Tz>(report: &ConflictReport, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match report.conflicts.as_slice() {
        [] => String::new(),
        [only] => {
            let r = &only.reservation;
            format!(
                "Scheduling conflict detected with \"{}\" ({})",
                r.product_name,
                format_time_range_in(r.start_time, r.end_time, tz)
            )
        }
        many => format!(
            "{} scheduling conflicts detected. Please adjust the time or choose different equipment.",
            many.len()
        ),
    }
}

/// One line per conflict: product, its reservation window, and the shared window.
pub fn describe_conflicts(report: &ConflictReport) -> Vec<String> {
    describe_conflicts_in(report, &Utc)
}

pub fn describe_conflicts_in<Tz>(report: &ConflictReport, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    report
        .conflicts
        .iter()
        .map(|c| {
            let r = &c.reservation;
            format!(
                "\"{}\" [{}] ({}), overlapping {}",
                r.product_name,
                r.id,
                format_time_range_in(r.start_time, r.end_time, tz),
                format_time_range_in(c.overlap_start, c.overlap_end, tz)
            )
        })
        .collect()
}
