//! Tests for conflict aggregation over a reservation snapshot.

use booking_engine::{
    detect_conflicts, detect_conflicts_with_policy, BatchRequest, BatchStatus, BookingError,
    ConflictPolicy, Reservation, TimeInterval,
};
use chrono::{DateTime, TimeZone, Utc};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 24, hour, 0, 0).unwrap()
}

/// Helper to create a reservation on 2024-07-24 from hour bounds.
fn batch(id: &str, equipment: &str, start_hour: u32, end_hour: u32) -> Reservation {
    Reservation::new(
        id,
        equipment,
        format!("Product {}", id),
        at(start_hour),
        at(end_hour),
    )
}

/// The two seeded batches operators see on first load.
fn seeded() -> Vec<Reservation> {
    vec![
        Reservation::new(
            "batch-001",
            "eq-001",
            "Pharmaceutical Compound XR-25",
            at(8),
            at(16),
        ),
        Reservation::new("batch-002", "eq-003", "Industrial Polymer P-402", at(6), at(14))
            .with_status(BatchStatus::InProgress),
    ]
}

#[test]
fn overlapping_candidate_reports_one_conflict_with_overlap_window() {
    let report = detect_conflicts("eq-001", at(12), at(20), &seeded(), None).unwrap();

    assert!(report.has_conflicts());
    assert_eq!(report.len(), 1);
    assert_eq!(report.conflicts[0].reservation.id, "batch-001");
    assert_eq!(
        report.conflicts[0].overlap(),
        TimeInterval::new(at(12), at(16)).unwrap()
    );
}

#[test]
fn other_equipment_never_conflicts() {
    // Same window as batch-001, but on eq-002.
    let report = detect_conflicts("eq-002", at(8), at(16), &seeded(), None).unwrap();
    assert!(!report.has_conflicts());
    assert!(report.conflicts.is_empty());
}

#[test]
fn adjacent_candidate_is_not_a_conflict() {
    let report = detect_conflicts("eq-001", at(16), at(20), &seeded(), None).unwrap();
    assert!(!report.has_conflicts());

    let report = detect_conflicts("eq-001", at(4), at(8), &seeded(), None).unwrap();
    assert!(!report.has_conflicts());
}

#[test]
fn editing_a_reservation_does_not_conflict_with_itself() {
    let report =
        detect_conflicts("eq-001", at(8), at(16), &seeded(), Some("batch-001")).unwrap();
    assert!(!report.has_conflicts());
}

#[test]
fn exclusion_only_skips_the_named_reservation() {
    let reservations = vec![batch("a", "eq-001", 8, 12), batch("b", "eq-001", 10, 14)];
    let report = detect_conflicts("eq-001", at(9), at(11), &reservations, Some("a")).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.conflicts[0].reservation.id, "b");
}

#[test]
fn exclusion_id_matching_nothing_is_not_an_error() {
    let report =
        detect_conflicts("eq-001", at(12), at(20), &seeded(), Some("batch-999")).unwrap();
    assert_eq!(report.len(), 1);
}

#[test]
fn inverted_candidate_is_rejected() {
    let err = detect_conflicts("eq-001", at(20), at(12), &seeded(), None).unwrap_err();
    assert!(matches!(err, BookingError::InvalidInterval { .. }));
}

#[test]
fn zero_length_candidate_is_rejected() {
    let err = detect_conflicts("eq-001", at(12), at(12), &[], None).unwrap_err();
    assert!(matches!(err, BookingError::InvalidInterval { start, end } if start == end));
}

#[test]
fn empty_snapshot_has_no_conflicts() {
    let report = detect_conflicts("eq-001", at(8), at(16), &[], None).unwrap();
    assert!(!report.has_conflicts());
}

#[test]
fn conflicts_keep_snapshot_order() {
    // Input order deliberately differs from start-time order.
    let reservations = vec![
        batch("late", "eq-001", 14, 18),
        batch("other", "eq-002", 9, 17),
        batch("early", "eq-001", 6, 10),
        batch("middle", "eq-001", 11, 12),
    ];

    let report = detect_conflicts("eq-001", at(8), at(16), &reservations, None).unwrap();
    let ids: Vec<&str> = report
        .conflicts
        .iter()
        .map(|c| c.reservation.id.as_str())
        .collect();

    assert_eq!(ids, vec!["late", "early", "middle"]);
    assert_eq!(report.conflicts[0].overlap(), TimeInterval::new(at(14), at(16)).unwrap());
    assert_eq!(report.conflicts[1].overlap(), TimeInterval::new(at(8), at(10)).unwrap());
    assert_eq!(report.conflicts[2].overlap(), TimeInterval::new(at(11), at(12)).unwrap());
}

#[test]
fn cancelled_reservations_block_by_default() {
    let reservations = vec![batch("c", "eq-001", 8, 16).with_status(BatchStatus::Cancelled)];
    let report = detect_conflicts("eq-001", at(10), at(12), &reservations, None).unwrap();
    assert!(report.has_conflicts());
}

#[test]
fn policy_can_release_cancelled_reservations() {
    let reservations = vec![
        batch("c", "eq-001", 8, 16).with_status(BatchStatus::Cancelled),
        batch("h", "eq-001", 11, 13).with_status(BatchStatus::OnHold),
    ];
    let report = detect_conflicts_with_policy(
        "eq-001",
        at(10),
        at(12),
        &reservations,
        None,
        &ConflictPolicy::ignore_cancelled(),
    )
    .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.conflicts[0].reservation.id, "h");
}

#[test]
fn policy_can_release_terminal_reservations() {
    let reservations = vec![
        batch("done", "eq-001", 8, 11).with_status(BatchStatus::Completed),
        batch("c", "eq-001", 8, 16).with_status(BatchStatus::Cancelled),
        batch("run", "eq-001", 9, 13).with_status(BatchStatus::InProgress),
        batch("h", "eq-001", 11, 13).with_status(BatchStatus::OnHold),
        batch("s", "eq-001", 10, 11),
    ];
    let policy = ConflictPolicy::ignore_terminal();
    let report =
        detect_conflicts_with_policy("eq-001", at(10), at(12), &reservations, None, &policy)
            .unwrap();

    let ids: Vec<&str> = report.conflicts.iter().map(|c| c.reservation.id.as_str()).collect();
    assert_eq!(ids, vec!["run", "h", "s"]);
    assert!(!policy.blocks(BatchStatus::Completed));
    assert!(!policy.blocks(BatchStatus::Cancelled));
    assert!(policy.blocks(BatchStatus::OnHold));
}

#[test]
fn malformed_snapshot_entries_are_skipped() {
    // A stored reservation with end == start would otherwise yield an empty overlap.
    let reservations = vec![batch("broken", "eq-001", 10, 10), batch("ok", "eq-001", 9, 11)];
    let report = detect_conflicts("eq-001", at(8), at(12), &reservations, None).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.conflicts[0].reservation.id, "ok");
}

#[test]
fn identical_inputs_give_identical_reports() {
    let reservations = seeded();
    let first = detect_conflicts("eq-001", at(7), at(9), &reservations, None).unwrap();
    let second = detect_conflicts("eq-001", at(7), at(9), &reservations, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_serializes_with_camel_case_wire_names() {
    let report = detect_conflicts("eq-001", at(12), at(20), &seeded(), None).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["hasConflicts"], true);
    assert_eq!(json["conflicts"][0]["reservation"]["id"], "batch-001");
    assert_eq!(json["conflicts"][0]["overlapStart"], "2024-07-24T12:00:00Z");
    assert_eq!(json["conflicts"][0]["overlapEnd"], "2024-07-24T16:00:00Z");

    let back: booking_engine::ConflictReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn reservations_deserialize_from_snake_case_json() {
    let json = r#"[{
        "id": "batch-001",
        "equipment_id": "eq-001",
        "product_name": "Pharmaceutical Compound XR-25",
        "start_time": "2024-07-24T08:00:00Z",
        "end_time": "2024-07-24T16:00:00Z",
        "status": "in_progress",
        "priority": "high",
        "batch_size": 850,
        "operator": "Sarah Johnson"
    }]"#;
    let reservations: Vec<Reservation> = serde_json::from_str(json).unwrap();

    assert_eq!(reservations[0].status, BatchStatus::InProgress);
    assert_eq!(reservations[0].batch_size, Some(850.0));
    assert_eq!(reservations[0].interval(), TimeInterval::new(at(8), at(16)).unwrap());
}

#[test]
fn request_blank_times_deserialize_as_missing() {
    let json = r#"{
        "equipment_id": "eq-001",
        "product_name": "Specialty Chemical SC-789",
        "start_time": "",
        "end_time": "  "
    }"#;
    let request: BatchRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.start_time, None);
    assert_eq!(request.end_time, None);

    let request: BatchRequest =
        serde_json::from_str(r#"{"start_time": null, "end_time": null}"#).unwrap();
    assert_eq!(request, BatchRequest::default());
}

#[test]
fn request_accepts_form_field_times() {
    let json = r#"{
        "equipment_id": "eq-001",
        "product_name": "Specialty Chemical SC-789",
        "start_time": "2024-07-24T08:00",
        "end_time": "2024-07-24T18:00:00+02:00"
    }"#;
    let request: BatchRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.start_time, Some(at(8)));
    assert_eq!(request.end_time, Some(at(16)));
}

#[test]
fn request_rejects_unparseable_time() {
    let err = serde_json::from_str::<BatchRequest>(r#"{"start_time": "soon"}"#).unwrap_err();
    assert!(err.to_string().contains("soon"));
}
