//! Detect collisions between a candidate booking and existing reservations.
//!
//! The candidate is compared against every reservation on the same equipment.
//! Adjacent reservations (where one ends exactly when the other starts) are NOT
//! conflicts. Results keep the relative order of the input snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interval::{self, TimeInterval};
use crate::reservation::{BatchStatus, Reservation};

/// Which reservations are allowed to block a new booking.
///
/// The default blocks on every status, including Cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPolicy {
    /// Reservations in these statuses never produce a conflict.
    #[serde(default)]
    pub non_blocking_statuses: Vec<BatchStatus>,
}

impl ConflictPolicy {
    /// Cancelled reservations no longer hold their equipment.
    pub fn ignore_cancelled() -> Self {
        Self {
            non_blocking_statuses: vec![BatchStatus::Cancelled],
        }
    }

    /// Only batches that may still run hold their equipment.
    pub fn ignore_terminal() -> Self {
        Self {
            non_blocking_statuses: BatchStatus::ALL
                .into_iter()
                .filter(|s| s.is_terminal())
                .collect(),
        }
    }

    pub fn blocks(&self, status: BatchStatus) -> bool {
        !self.non_blocking_statuses.contains(&status)
    }
}

/// One existing reservation that collides with the candidate window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub reservation: Reservation,
    /// Start of the shared window, `max(candidate.start, reservation.start)`.
    pub overlap_start: DateTime<Utc>,
    /// End of the shared window, `min(candidate.end, reservation.end)`.
    pub overlap_end: DateTime<Utc>,
}

impl Conflict {
    pub fn overlap(&self) -> TimeInterval {
        TimeInterval {
            start: self.overlap_start,
            end: self.overlap_end,
        }
    }
}

/// Result of a conflict check.
///
/// Serializes as `{ "hasConflicts": bool, "conflicts": [...] }`. The flag is
/// always derived from the list, never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "ReportWire", from = "ReportWire")]
pub struct ConflictReport {
    /// One entry per colliding reservation, in snapshot order.
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// The authoritative gate: a booking must not be committed while this is true.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportWire {
    #[serde(default)]
    has_conflicts: bool,
    #[serde(default)]
    conflicts: Vec<Conflict>,
}

impl From<ConflictReport> for ReportWire {
    fn from(report: ConflictReport) -> Self {
        Self {
            has_conflicts: report.has_conflicts(),
            conflicts: report.conflicts,
        }
    }
}

impl From<ReportWire> for ConflictReport {
    fn from(wire: ReportWire) -> Self {
        Self {
            conflicts: wire.conflicts,
        }
    }
}

/// Find every reservation on `equipment_id` whose window overlaps
/// `[candidate_start, candidate_end)`.
///
/// `exclude_id` names the reservation being edited so it does not collide with
/// itself. Every status blocks; see [`detect_conflicts_with_policy`] to relax that.
///
/// # Errors
/// Returns `BookingError::InvalidInterval` if `candidate_start >= candidate_end`.
/// An empty snapshot, an unknown equipment id, or an exclusion id that matches
/// nothing are not errors and produce an empty report.
pub fn detect_conflicts(
    equipment_id: &str,
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    reservations: &[Reservation],
    exclude_id: Option<&str>,
) -> Result<ConflictReport> {
    detect_conflicts_with_policy(
        equipment_id,
        candidate_start,
        candidate_end,
        reservations,
        exclude_id,
        &ConflictPolicy::default(),
    )
}

/// [`detect_conflicts`] with an explicit status policy.
///
/// Reservations whose status the policy marks non-blocking are dropped before the
/// equipment filter.
pub fn detect_conflicts_with_policy(
    equipment_id: &str,
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    reservations: &[Reservation],
    exclude_id: Option<&str>,
    policy: &ConflictPolicy,
) -> Result<ConflictReport> {
    let candidate = TimeInterval::new(candidate_start, candidate_end)?;

    let conflicts: Vec<Conflict> = reservations
        .iter()
        .filter(|r| policy.blocks(r.status))
        .filter(|r| r.equipment_id == equipment_id && Some(r.id.as_str()) != exclude_id)
        .filter_map(|r| collide(&candidate, r))
        .collect();

    tracing::debug!(
        equipment_id,
        candidate_start = %candidate.start,
        candidate_end = %candidate.end,
        snapshot = reservations.len(),
        conflicts = conflicts.len(),
        "conflict check complete"
    );

    Ok(ConflictReport { conflicts })
}

/// Compare one same-equipment reservation against a valid candidate.
///
/// Malformed snapshot entries (`start_time >= end_time`) are skipped so no report
/// ever carries an empty overlap window.
pub(crate) fn collide(candidate: &TimeInterval, reservation: &Reservation) -> Option<Conflict> {
    let existing = reservation.interval();
    if !existing.is_valid() {
        tracing::warn!(
            reservation_id = %reservation.id,
            start = %existing.start,
            end = %existing.end,
            "skipping reservation with empty or inverted window"
        );
        return None;
    }

    let overlap = interval::overlap_range(
        candidate.start,
        candidate.end,
        existing.start,
        existing.end,
    )?;

    tracing::trace!(
        reservation_id = %reservation.id,
        overlap_start = %overlap.start,
        overlap_end = %overlap.end,
        "collision"
    );

    Some(Conflict {
        reservation: reservation.clone(),
        overlap_start: overlap.start,
        overlap_end: overlap.end,
    })
}
