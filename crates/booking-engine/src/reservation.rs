//! Reservation ("batch") records as supplied by the persistence layer.
//!
//! The engine never stores or mutates these. Each call receives a read-only
//! snapshot and forgets it when the call returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::interval::{self, TimeInterval};

/// Lifecycle status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 5] = [
        BatchStatus::Scheduled,
        BatchStatus::InProgress,
        BatchStatus::Completed,
        BatchStatus::Cancelled,
        BatchStatus::OnHold,
    ];

    /// Completed and Cancelled batches will not run again.
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// A time-bounded claim on one piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Stable unique id.
    pub id: String,
    /// Opaque id of the booked equipment.
    pub equipment_id: String,
    /// Product or activity shown to operators.
    pub product_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<BatchPriority>,
    /// Batch size in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// A scheduled reservation with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        equipment_id: impl Into<String>,
        product_name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            equipment_id: equipment_id.into(),
            product_name: product_name.into(),
            start_time,
            end_time,
            status: BatchStatus::Scheduled,
            priority: None,
            batch_size: None,
            operator: None,
            recipe_id: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: BatchStatus) -> Self {
        self.status = status;
        self
    }

    /// The stored window, unchecked. Snapshot entries may be malformed.
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// A proposed create or edit, as submitted by the booking form.
///
/// Times are optional because a half-filled form is still validated. On the wire
/// they accept anything [`interval::parse_timestamp`] does, and a blank string is
/// the same as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub equipment_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "form_time")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "form_time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<BatchPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn form_time<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => interval::parse_timestamp(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
