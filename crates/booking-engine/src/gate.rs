//! The write-path gate: form rules plus conflict detection as one verdict.
//!
//! Call this immediately before committing a booking. A verdict only allows the
//! write when the request passes every form rule AND collides with nothing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::conflict::{self, ConflictReport};
use crate::error::Result;
use crate::reservation::{BatchRequest, Reservation};
use crate::report;
use crate::validation::{self, FieldError, FormMode};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "VerdictWire")]
pub struct BookingVerdict {
    pub field_errors: Vec<FieldError>,
    /// Empty when the request never had a usable window to check.
    pub report: ConflictReport,
}

impl BookingVerdict {
    pub fn is_allowed(&self) -> bool {
        self.field_errors.is_empty() && !self.report.has_conflicts()
    }

    /// The primary conflict message, empty when nothing collides.
    pub fn conflict_message(&self) -> String {
        report::format_message(&self.report)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerdictWire {
    allowed: bool,
    field_errors: Vec<FieldError>,
    conflict_message: String,
    report: ConflictReport,
}

impl From<BookingVerdict> for VerdictWire {
    fn from(verdict: BookingVerdict) -> Self {
        Self {
            allowed: verdict.is_allowed(),
            conflict_message: verdict.conflict_message(),
            field_errors: verdict.field_errors,
            report: verdict.report,
        }
    }
}

/// Validate `request` and, when it names equipment and a well-formed window,
/// check it against `reservations`.
///
/// In `FormMode::Edit`, pass the edited reservation's id as `exclude_id`.
///
/// # Errors
/// Conflict detection only runs on windows that already passed the form rules,
/// so `BookingError::InvalidInterval` is not expected here; any error should
/// still be treated as "do not write".
pub fn check_booking(
    request: &BatchRequest,
    mode: FormMode,
    exclude_id: Option<&str>,
    reservations: &[Reservation],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<BookingVerdict> {
    let field_errors = validation::validate_request(request, mode, now, &config.validation);

    let report = match (request.start_time, request.end_time) {
        (Some(start), Some(end)) if start < end && !request.equipment_id.trim().is_empty() => {
            conflict::detect_conflicts_with_policy(
                &request.equipment_id,
                start,
                end,
                reservations,
                exclude_id,
                &config.conflicts,
            )?
        }
        _ => ConflictReport::default(),
    };

    let verdict = BookingVerdict {
        field_errors,
        report,
    };

    tracing::info!(
        equipment_id = %request.equipment_id,
        ?mode,
        allowed = verdict.is_allowed(),
        field_errors = verdict.field_errors.len(),
        conflicts = verdict.report.len(),
        "booking checked"
    );

    Ok(verdict)
}
