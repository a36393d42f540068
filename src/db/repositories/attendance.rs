use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{parse_datetime, parse_status, to_u64},
    models::{AttendanceRecord, EventAttendanceMetadata},
    Database,
};

/// Document id reserved for the per-event counter in the wire contract;
/// attendance rows must never claim it.
pub const RESERVED_METADATA_ID: &str = "metadata";

fn row_to_record(row: &Row) -> Result<AttendanceRecord> {
    let recorded_at: String = row.get("recorded_at")?;
    let status: String = row.get("status")?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        subject_identifier: row.get("subject_identifier")?,
        subject_name: row.get("subject_name")?,
        recorded_by: row.get("recorded_by")?,
        recorded_at: parse_datetime(&recorded_at, "recorded_at")?,
        status: parse_status(&status)?,
        notes: row.get("notes")?,
        image_path: row.get("image_path")?,
    })
}

impl Database {
    pub async fn insert_attendance_record(&self, record: &AttendanceRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            if record.id == RESERVED_METADATA_ID {
                bail!("attendance record id '{RESERVED_METADATA_ID}' is reserved");
            }
            conn.execute(
                "INSERT INTO attendance_records
                     (id, event_id, subject_identifier, subject_name, recorded_by,
                      recorded_at, status, notes, image_path)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.event_id,
                    record.subject_identifier,
                    record.subject_name,
                    record.recorded_by,
                    record.recorded_at.to_rfc3339(),
                    record.status.as_str(),
                    record.notes,
                    record.image_path,
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Bump the event counter by exactly one. A single upsert statement:
    /// the first writer creates the row at 1, concurrent and later writers
    /// fall through to the increment. The counter value is never read back
    /// and rewritten by callers.
    pub async fn increment_event_attendance(
        &self,
        event_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let event_id = event_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO event_attendance (event_id, total_attendees, last_updated)
                 VALUES (?1, 1, ?2)
                 ON CONFLICT(event_id) DO UPDATE SET
                     total_attendees = total_attendees + 1,
                     last_updated = excluded.last_updated",
                params![event_id, updated_at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_event_attendance(
        &self,
        event_id: &str,
    ) -> Result<Option<EventAttendanceMetadata>> {
        let event_id = event_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT event_id, total_attendees, last_updated
                 FROM event_attendance
                 WHERE event_id = ?1",
            )?;

            let mut rows = stmt.query(params![event_id])?;
            let metadata = match rows.next()? {
                Some(row) => {
                    let last_updated: String = row.get("last_updated")?;
                    Some(EventAttendanceMetadata {
                        event_id: row.get("event_id")?,
                        total_attendees: to_u64(
                            row.get::<_, i64>("total_attendees")?,
                            "total_attendees",
                        )?,
                        last_updated: parse_datetime(&last_updated, "last_updated")?,
                    })
                }
                None => None,
            };
            Ok(metadata)
        })
        .await
    }

    pub async fn list_records_for_event(&self, event_id: &str) -> Result<Vec<AttendanceRecord>> {
        let event_id = event_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, event_id, subject_identifier, subject_name, recorded_by,
                        recorded_at, status, notes, image_path
                 FROM attendance_records
                 WHERE event_id = ?1
                 ORDER BY recorded_at ASC",
            )?;

            let mut rows = stmt.query(params![event_id])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(row_to_record(row)?);
            }

            Ok(records)
        })
        .await
    }

    pub async fn count_records_for_subject(
        &self,
        event_id: &str,
        subject_identifier: &str,
    ) -> Result<u64> {
        let event_id = event_id.to_string();
        let subject_identifier = subject_identifier.to_string();
        self.execute(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM attendance_records
                 WHERE event_id = ?1 AND subject_identifier = ?2",
                params![event_id, subject_identifier],
                |row| row.get(0),
            )?;
            to_u64(count, "record count")
        })
        .await
    }
}
