//! Booking form validation.
//!
//! One canonical rule set for create and edit forms, separate from the engine's
//! own `InvalidInterval` check. The rules that vary between deployments (whether
//! operator and batch size are mandatory, whether past start times are accepted)
//! come from [`ValidationPolicy`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::BatchRequest;

/// Whether the form is creating a new batch or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// When a start time before "now" is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastStartRule {
    Allow,
    /// Reject on create; an edit may keep a batch that already started.
    #[default]
    CreateOnly,
    Always,
}

impl PastStartRule {
    fn rejects(self, mode: FormMode) -> bool {
        match self {
            PastStartRule::Allow => false,
            PastStartRule::CreateOnly => mode == FormMode::Create,
            PastStartRule::Always => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub require_operator: bool,
    pub require_batch_size: bool,
    pub past_start: PastStartRule,
}

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EquipmentId,
    ProductName,
    StartTime,
    EndTime,
    BatchSize,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Validate a proposed booking. An empty result means the form may be submitted
/// (subject to conflict detection).
///
/// At most one error is reported per field, in field order.
pub fn validate_request(
    request: &BatchRequest,
    mode: FormMode,
    now: DateTime<Utc>,
    policy: &ValidationPolicy,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.equipment_id.trim().is_empty() {
        errors.push(FieldError::new(Field::EquipmentId, "Equipment is required"));
    }
    if request.product_name.trim().is_empty() {
        errors.push(FieldError::new(Field::ProductName, "Product name is required"));
    }

    match request.start_time {
        None => errors.push(FieldError::new(Field::StartTime, "Start time is required")),
        Some(start) if start < now && policy.past_start.rejects(mode) => errors.push(
            FieldError::new(Field::StartTime, "Start time cannot be in the past"),
        ),
        Some(_) => {}
    }

    match (request.start_time, request.end_time) {
        (_, None) => errors.push(FieldError::new(Field::EndTime, "End time is required")),
        (Some(start), Some(end)) if end <= start => errors.push(FieldError::new(
            Field::EndTime,
            "End time must be after start time",
        )),
        _ => {}
    }

    match request.batch_size {
        Some(size) if !size.is_finite() || size <= 0.0 => errors.push(FieldError::new(
            Field::BatchSize,
            "Batch size must be a positive number",
        )),
        None if policy.require_batch_size => {
            errors.push(FieldError::new(Field::BatchSize, "Batch size is required"))
        }
        _ => {}
    }

    let has_operator = request
        .operator
        .as_deref()
        .is_some_and(|op| !op.trim().is_empty());
    if policy.require_operator && !has_operator {
        errors.push(FieldError::new(Field::Operator, "Operator is required"));
    }

    if !errors.is_empty() {
        tracing::debug!(?mode, errors = errors.len(), "booking request rejected by form rules");
    }

    errors
}
