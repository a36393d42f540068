use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted exclusion list row. `event_id` of `None` is the global scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionEntry {
    pub id: Option<i64>,
    pub event_id: Option<String>,
    pub name: String,
    pub added_at: DateTime<Utc>,
}
