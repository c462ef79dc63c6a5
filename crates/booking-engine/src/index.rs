//! Pre-indexed reservation snapshot for repeated conflict queries.
//!
//! Groups the snapshot by equipment id and sorts each group by start time. A query
//! only visits reservations whose start lies in
//! `(candidate.start - longest, candidate.end)`, where `longest` is the longest
//! reservation on that equipment: anything starting earlier has already ended.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::conflict::{self, ConflictPolicy, ConflictReport};
use crate::error::Result;
use crate::interval::TimeInterval;
use crate::reservation::Reservation;

#[derive(Debug, Clone, Copy)]
struct Entry {
    start: DateTime<Utc>,
    /// Position in the original snapshot.
    position: usize,
}

#[derive(Debug, Clone, Default)]
struct EquipmentSlots {
    /// Sorted by `(start, position)`.
    entries: Vec<Entry>,
    longest: TimeDelta,
}

/// An immutable snapshot indexed by equipment.
///
/// Answers exactly what [`conflict::detect_conflicts_with_policy`] answers for the
/// same snapshot, in the same order.
#[derive(Debug, Clone, Default)]
pub struct ReservationIndex {
    reservations: Vec<Reservation>,
    by_equipment: HashMap<String, EquipmentSlots>,
}

impl ReservationIndex {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        let mut by_equipment: HashMap<String, EquipmentSlots> = HashMap::new();

        for (position, r) in reservations.iter().enumerate() {
            let slots = by_equipment.entry(r.equipment_id.clone()).or_default();
            slots.entries.push(Entry {
                start: r.start_time,
                position,
            });
            // Inverted windows have a negative duration and never raise the bound.
            slots.longest = slots.longest.max(r.end_time - r.start_time);
        }

        for slots in by_equipment.values_mut() {
            slots.entries.sort_by_key(|e| (e.start, e.position));
        }

        tracing::debug!(
            reservations = reservations.len(),
            equipment = by_equipment.len(),
            "reservation index built"
        );

        Self {
            reservations,
            by_equipment,
        }
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// The snapshot in its original order.
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// All reservations booked on `equipment_id`, in snapshot order.
    pub fn for_equipment<'a>(&'a self, equipment_id: &str) -> impl Iterator<Item = &'a Reservation> {
        let mut positions: Vec<usize> = self
            .by_equipment
            .get(equipment_id)
            .map(|slots| slots.entries.iter().map(|e| e.position).collect())
            .unwrap_or_default();
        positions.sort_unstable();
        positions.into_iter().map(move |p| &self.reservations[p])
    }

    /// Same contract as [`conflict::detect_conflicts`].
    pub fn detect_conflicts(
        &self,
        equipment_id: &str,
        candidate_start: DateTime<Utc>,
        candidate_end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> Result<ConflictReport> {
        self.detect_conflicts_with_policy(
            equipment_id,
            candidate_start,
            candidate_end,
            exclude_id,
            &ConflictPolicy::default(),
        )
    }

    /// Same contract as [`conflict::detect_conflicts_with_policy`].
    pub fn detect_conflicts_with_policy(
        &self,
        equipment_id: &str,
        candidate_start: DateTime<Utc>,
        candidate_end: DateTime<Utc>,
        exclude_id: Option<&str>,
        policy: &ConflictPolicy,
    ) -> Result<ConflictReport> {
        let candidate = TimeInterval::new(candidate_start, candidate_end)?;

        let Some(slots) = self.by_equipment.get(equipment_id) else {
            return Ok(ConflictReport::default());
        };

        let lo = match candidate.start.checked_sub_signed(slots.longest) {
            Some(earliest) => slots.entries.partition_point(|e| e.start <= earliest),
            None => 0,
        };
        let hi = slots.entries.partition_point(|e| e.start < candidate.end);

        let mut positions: Vec<usize> = slots.entries[lo..hi.max(lo)]
            .iter()
            .map(|e| e.position)
            .collect();
        positions.sort_unstable();

        let conflicts = positions
            .into_iter()
            .map(|p| &self.reservations[p])
            .filter(|r| policy.blocks(r.status))
            .filter(|r| Some(r.id.as_str()) != exclude_id)
            .filter_map(|r| conflict::collide(&candidate, r))
            .collect::<Vec<_>>();

        tracing::debug!(
            equipment_id,
            scanned = hi.saturating_sub(lo),
            conflicts = conflicts.len(),
            "indexed conflict check complete"
        );

        Ok(ConflictReport { conflicts })
    }
}

impl From<Vec<Reservation>> for ReservationIndex {
    fn from(reservations: Vec<Reservation>) -> Self {
        Self::new(reservations)
    }
}
