//! Durable attendance ledger: append-only records plus the derived
//! per-event counter.
//!
//! The record insert and the counter update are deliberately separate
//! writes. If the counter update fails after a successful insert, the
//! counter undercounts until a later scan's increment or an out-of-band
//! repair; that divergence is reported in the receipt and logged, never
//! absorbed.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

use crate::db::{AttendanceRecord, AttendanceStatus, Database};

/// Whether the counter kept up with the record write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterState {
    Updated,
    /// Record written, counter increment failed. Retryable inconsistency;
    /// the record itself stands.
    Diverged,
}

/// Outcome of a `record` call.
#[derive(Debug, Clone)]
pub enum RecordReceipt {
    Recorded {
        record: AttendanceRecord,
        counter: CounterState,
    },
    /// Repeat policy disallows a second record for this subject.
    AlreadyRecorded {
        event_id: String,
        subject_identifier: String,
    },
}

/// Policy knobs for the ledger.
///
/// `allow_repeat_entries` decides what a rescan of the same card does:
/// `true` (the default) writes a second record and increments again,
/// treating each scan as a visit; `false` refuses the duplicate.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LedgerPolicy {
    pub allow_repeat_entries: bool,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            allow_repeat_entries: true,
        }
    }
}

#[derive(Clone)]
pub struct AttendanceLedger {
    db: Database,
    policy: LedgerPolicy,
}

impl AttendanceLedger {
    pub fn new(db: Database, policy: LedgerPolicy) -> Self {
        Self { db, policy }
    }

    /// Append a brand-new attendance record and bump the event counter.
    ///
    /// Never merges with prior records. The counter update is a
    /// server-applied atomic increment, so concurrent callers on the same
    /// event cannot lose updates.
    pub async fn record(
        &self,
        event_id: &str,
        subject_identifier: &str,
        subject_name: &str,
        recorded_by: &str,
        status: AttendanceStatus,
        notes: Option<String>,
        image_path: Option<String>,
    ) -> Result<RecordReceipt> {
        if !self.policy.allow_repeat_entries {
            let prior = self
                .db
                .count_records_for_subject(event_id, subject_identifier)
                .await
                .context("failed to check for a prior record")?;
            if prior > 0 {
                info!(
                    "subject {subject_identifier} already recorded for event {event_id}, \
                     repeat entries disallowed"
                );
                return Ok(RecordReceipt::AlreadyRecorded {
                    event_id: event_id.to_string(),
                    subject_identifier: subject_identifier.to_string(),
                });
            }
        }

        let now = Utc::now();
        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            subject_identifier: subject_identifier.to_string(),
            subject_name: subject_name.to_string(),
            recorded_by: recorded_by.to_string(),
            recorded_at: now,
            status,
            notes,
            image_path,
        };

        self.db
            .insert_attendance_record(&record)
            .await
            .context("failed to write attendance record")?;

        let counter = match self.db.increment_event_attendance(event_id, now).await {
            Ok(()) => CounterState::Updated,
            Err(err) => {
                // Monitored invariant violation: totalAttendees now
                // undercounts the records for this event.
                error!(
                    "attendance counter diverged for event {event_id} \
                     (record {} written, increment failed): {err:?}",
                    record.id
                );
                CounterState::Diverged
            }
        };

        Ok(RecordReceipt::Recorded { record, counter })
    }
}
