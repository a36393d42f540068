//! Ledger semantics under concurrent writers: the per-event counter must
//! equal the number of records ever written, regardless of interleaving.

use rollcall::db::{AttendanceStatus, Database};
use rollcall::{AttendanceLedger, CounterState, LedgerPolicy, RecordReceipt};
use tempfile::TempDir;

fn open_db(dir: &TempDir) -> Database {
    Database::new(dir.path().join("rollcall.sqlite3")).unwrap()
}

fn ledger(db: &Database, allow_repeat_entries: bool) -> AttendanceLedger {
    AttendanceLedger::new(
        db.clone(),
        LedgerPolicy {
            allow_repeat_entries,
        },
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_records_never_lose_counter_updates() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let ledger = ledger(&db, true);

    const WRITERS: usize = 32;
    let mut handles = Vec::new();
    for i in 0..WRITERS {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .record(
                    "event-1",
                    &format!("10000{i:03}"),
                    &format!("Attendee {i}"),
                    &format!("device-{}", i % 4),
                    AttendanceStatus::Present,
                    None,
                    None,
                )
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        match handle.await.unwrap() {
            RecordReceipt::Recorded { counter, .. } => {
                assert_eq!(counter, CounterState::Updated)
            }
            other => panic!("unexpected receipt: {other:?}"),
        }
    }

    let metadata = db.get_event_attendance("event-1").await.unwrap().unwrap();
    assert_eq!(metadata.total_attendees, WRITERS as u64);

    let records = db.list_records_for_event("event-1").await.unwrap();
    assert_eq!(records.len(), WRITERS);
}

#[tokio::test]
async fn first_record_creates_the_counter_at_one() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    assert!(db.get_event_attendance("event-1").await.unwrap().is_none());

    ledger(&db, true)
        .record(
            "event-1",
            "12345678",
            "Jane Smith",
            "device-a",
            AttendanceStatus::Present,
            None,
            None,
        )
        .await
        .unwrap();

    let metadata = db.get_event_attendance("event-1").await.unwrap().unwrap();
    assert_eq!(metadata.total_attendees, 1);
}

#[tokio::test]
async fn counters_are_scoped_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let ledger = ledger(&db, true);

    for event in ["event-a", "event-a", "event-b"] {
        ledger
            .record(
                event,
                "12345678",
                "Jane Smith",
                "device-a",
                AttendanceStatus::Present,
                None,
                None,
            )
            .await
            .unwrap();
    }

    let a = db.get_event_attendance("event-a").await.unwrap().unwrap();
    let b = db.get_event_attendance("event-b").await.unwrap().unwrap();
    assert_eq!(a.total_attendees, 2);
    assert_eq!(b.total_attendees, 1);
}

#[tokio::test]
async fn repeat_scans_append_when_policy_allows() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let ledger = ledger(&db, true);

    for _ in 0..2 {
        let receipt = ledger
            .record(
                "event-1",
                "12345678",
                "Jane Smith",
                "device-a",
                AttendanceStatus::Present,
                None,
                None,
            )
            .await
            .unwrap();
        assert!(matches!(receipt, RecordReceipt::Recorded { .. }));
    }

    let records = db.list_records_for_event("event-1").await.unwrap();
    assert_eq!(records.len(), 2);
    let metadata = db.get_event_attendance("event-1").await.unwrap().unwrap();
    assert_eq!(metadata.total_attendees, 2);
}

#[tokio::test]
async fn repeat_scans_refused_when_policy_disallows() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let ledger = ledger(&db, false);

    let first = ledger
        .record(
            "event-1",
            "12345678",
            "Jane Smith",
            "device-a",
            AttendanceStatus::Present,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(matches!(first, RecordReceipt::Recorded { .. }));

    let second = ledger
        .record(
            "event-1",
            "12345678",
            "Jane Smith",
            "device-b",
            AttendanceStatus::Present,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(matches!(second, RecordReceipt::AlreadyRecorded { .. }));

    let metadata = db.get_event_attendance("event-1").await.unwrap().unwrap();
    assert_eq!(metadata.total_attendees, 1);
}

#[tokio::test]
async fn counter_failure_leaves_the_record_standing() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    // Break only the counter path; the record insert must still succeed.
    db.execute(|conn| {
        conn.execute_batch("DROP TABLE event_attendance")?;
        Ok(())
    })
    .await
    .unwrap();

    let receipt = ledger(&db, true)
        .record(
            "event-1",
            "12345678",
            "Jane Smith",
            "device-a",
            AttendanceStatus::Present,
            None,
            None,
        )
        .await
        .unwrap();

    match receipt {
        RecordReceipt::Recorded { counter, .. } => {
            assert_eq!(counter, CounterState::Diverged)
        }
        other => panic!("unexpected receipt: {other:?}"),
    }

    let records = db.list_records_for_event("event-1").await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn reserved_metadata_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    let record = rollcall::db::AttendanceRecord {
        id: "metadata".to_string(),
        event_id: "event-1".to_string(),
        subject_identifier: "12345678".to_string(),
        subject_name: "Jane Smith".to_string(),
        recorded_by: "device-a".to_string(),
        recorded_at: chrono::Utc::now(),
        status: AttendanceStatus::Present,
        notes: None,
        image_path: None,
    };

    assert!(db.insert_attendance_record(&record).await.is_err());
}

#[tokio::test]
async fn records_are_immutable_appends_with_fresh_ids() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let ledger = ledger(&db, true);

    let mut ids = std::collections::HashSet::new();
    for _ in 0..5 {
        match ledger
            .record(
                "event-1",
                "12345678",
                "Jane Smith",
                "device-a",
                AttendanceStatus::Present,
                Some("re-entry".to_string()),
                None,
            )
            .await
            .unwrap()
        {
            RecordReceipt::Recorded { record, .. } => {
                assert!(ids.insert(record.id.clone()), "record id reused");
            }
            other => panic!("unexpected receipt: {other:?}"),
        }
    }
}

#[tokio::test]
async fn exclusion_entries_persist_per_scope() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    db.add_exclusion_names(
        Some("event-1".to_string()),
        vec!["John Smith".to_string(), "john smith".to_string()],
    )
    .await
    .unwrap();
    db.add_exclusion_names(None, vec!["Jane Doe".to_string()])
        .await
        .unwrap();

    let event_list = db
        .load_exclusion_list(Some("event-1".to_string()))
        .await
        .unwrap();
    let global_list = db.load_exclusion_list(None).await.unwrap();

    // Case-insensitive duplicate collapsed on import.
    assert_eq!(event_list.len(), 1);
    assert!(event_list.contains("JOHN SMITH"));
    assert!(!event_list.contains("Jane Doe"));
    assert!(global_list.contains("jane doe"));
}
