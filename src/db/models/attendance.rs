//! Attendance ledger data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceStatus {
    Present,
    Flagged,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Flagged => "Flagged",
        }
    }
}

/// One attendance record per scan action. Immutable once written; there is
/// no update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub event_id: String,
    pub subject_identifier: String,
    pub subject_name: String,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub image_path: Option<String>,
}

/// Per-event counter row. `total_attendees` equals the number of records
/// ever successfully written for the event and never decreases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendanceMetadata {
    pub event_id: String,
    pub total_attendees: u64,
    pub last_updated: DateTime<Utc>,
}
