//! WASM bindings for booking-engine.
//!
//! Lets the browser scheduling UI call the engine directly instead of keeping its
//! own copy of the interval logic. All complex types cross the boundary as JSON
//! strings; reservations use the same snake_case records the backend serves.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir frontend/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::{BatchRequest, ConflictReport, EngineConfig, FormMode, Reservation};
use chrono::FixedOffset;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out. Errors are plain strings until the export layer.
// ---------------------------------------------------------------------------

fn parse_reservations(json: &str) -> Result<Vec<Reservation>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid reservations JSON: {}", e))
}

fn parse_config(json: Option<&str>) -> Result<EngineConfig, String> {
    match json {
        Some(json) if !json.trim().is_empty() => {
            EngineConfig::from_json_str(json).map_err(|e| e.to_string())
        }
        _ => Ok(EngineConfig::default()),
    }
}

fn parse_mode(mode: &str) -> Result<FormMode, String> {
    match mode {
        "create" => Ok(FormMode::Create),
        "edit" => Ok(FormMode::Edit),
        other => Err(format!("Unknown form mode '{}': expected create or edit", other)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn detect_conflicts_json(
    equipment_id: &str,
    start: &str,
    end: &str,
    reservations_json: &str,
    exclude_id: Option<&str>,
    config_json: Option<&str>,
) -> Result<String, String> {
    let start = booking_engine::parse_timestamp(start).map_err(|e| e.to_string())?;
    let end = booking_engine::parse_timestamp(end).map_err(|e| e.to_string())?;
    let reservations = parse_reservations(reservations_json)?;
    let config = parse_config(config_json)?;

    let report = booking_engine::detect_conflicts_with_policy(
        equipment_id,
        start,
        end,
        &reservations,
        exclude_id,
        &config.conflicts,
    )
    .map_err(|e| e.to_string())?;

    to_json(&report)
}

fn format_message_json(report_json: &str, utc_offset_minutes: Option<i32>) -> Result<String, String> {
    let report: ConflictReport = serde_json::from_str(report_json)
        .map_err(|e| format!("Invalid conflict report JSON: {}", e))?;

    match utc_offset_minutes {
        Some(minutes) => {
            let offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| format!("UTC offset out of range: {} minutes", minutes))?;
            Ok(booking_engine::format_message_in(&report, &offset))
        }
        None => Ok(booking_engine::format_message(&report)),
    }
}

fn check_booking_json(
    request_json: &str,
    mode: &str,
    reservations_json: &str,
    exclude_id: Option<&str>,
    now: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let request: BatchRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid booking request JSON: {}", e))?;
    let mode = parse_mode(mode)?;
    let reservations = parse_reservations(reservations_json)?;
    let now = booking_engine::parse_timestamp(now).map_err(|e| e.to_string())?;
    let config = parse_config(config_json)?;

    let verdict = booking_engine::check_booking(
        &request,
        mode,
        exclude_id,
        &reservations,
        now,
        &config,
    )
    .map_err(|e| e.to_string())?;

    to_json(&verdict)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Detect conflicts for a candidate window on one piece of equipment.
///
/// `reservations_json` is a JSON array of reservation records. Returns a JSON
/// string `{ hasConflicts, conflicts: [{ reservation, overlapStart, overlapEnd }] }`.
/// Throws when `start >= end`: callers must treat that as "do not save".
#[wasm_bindgen(js_name = "detectConflicts")]
pub fn detect_conflicts(
    equipment_id: &str,
    start: &str,
    end: &str,
    reservations_json: &str,
    exclude_id: Option<String>,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    detect_conflicts_json(
        equipment_id,
        start,
        end,
        reservations_json,
        exclude_id.as_deref(),
        config_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Render the primary message for a report returned by `detectConflicts`.
///
/// `utc_offset_minutes` is the display zone's offset east of UTC; pass
/// `-new Date().getTimezoneOffset()` for the browser's local time. Omit for UTC.
#[wasm_bindgen(js_name = "formatConflictMessage")]
pub fn format_conflict_message(
    report_json: &str,
    utc_offset_minutes: Option<i32>,
) -> Result<String, JsValue> {
    format_message_json(report_json, utc_offset_minutes).map_err(|e| JsValue::from_str(&e))
}

/// Run form validation and conflict detection for a create or edit.
///
/// `mode` is `"create"` or `"edit"`. Returns a JSON verdict
/// `{ allowed, fieldErrors, conflictMessage, report }`.
#[wasm_bindgen(js_name = "checkBooking")]
pub fn check_booking(
    request_json: &str,
    mode: &str,
    reservations_json: &str,
    exclude_id: Option<String>,
    now: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    check_booking_json(
        request_json,
        mode,
        reservations_json,
        exclude_id.as_deref(),
        now,
        config_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}
