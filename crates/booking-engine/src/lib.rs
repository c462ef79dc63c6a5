//! # booking-engine
//!
//! Deterministic conflict detection for reserving shared manufacturing equipment.
//!
//! Operators book equipment for time-bounded production runs ("batches"). Before a
//! booking is written, the engine decides whether the proposed window collides with
//! any existing reservation on the same equipment and explains every collision.
//! All intervals are half-open: a batch ending at 17:00 and another starting at
//! 17:00 do not conflict.
//!
//! The engine is stateless. Every call is a pure function of the reservation
//! snapshot the caller passes in, so it can be shared across threads freely.
//! Making "check then commit" atomic is the caller's job.
//!
//! ## Modules
//!
//! - [`interval`] — half-open `TimeInterval`, overlap primitive, timestamp parsing
//! - [`reservation`] — `Reservation`, `BatchStatus`, `BatchPriority`, `BatchRequest`
//! - [`conflict`] — aggregate collisions for a candidate window into a `ConflictReport`
//! - [`index`] — per-equipment sorted index behind the same detection contract
//! - [`report`] — user-facing conflict messages
//! - [`validation`] — configurable booking form rules
//! - [`gate`] — validation + conflict detection as one fail-closed verdict
//! - [`config`] — `EngineConfig` loaded from JSON
//! - [`error`] — Error types

pub mod config;
pub mod conflict;
pub mod error;
pub mod gate;
pub mod index;
pub mod interval;
pub mod report;
pub mod reservation;
pub mod validation;

pub use config::EngineConfig;
pub use conflict::{
    detect_conflicts, detect_conflicts_with_policy, Conflict, ConflictPolicy, ConflictReport,
};
pub use error::BookingError;
pub use gate::{check_booking, BookingVerdict};
pub use index::ReservationIndex;
pub use interval::{overlap_range, overlaps, parse_timestamp, TimeInterval};
pub use report::{
    describe_conflicts, describe_conflicts_in, format_message, format_message_in, format_time_range,
    format_time_range_in,
};
pub use reservation::{BatchPriority, BatchRequest, BatchStatus, Reservation};
pub use validation::{validate_request, Field, FieldError, FormMode, PastStartRule, ValidationPolicy};
