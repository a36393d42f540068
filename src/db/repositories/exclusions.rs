use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    helpers::parse_datetime,
    models::ExclusionEntry,
    Database,
};
use crate::exclusion::ExclusionList;

fn row_to_entry(row: &Row) -> Result<ExclusionEntry> {
    let added_at: String = row.get("added_at")?;
    Ok(ExclusionEntry {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        name: row.get("name")?,
        added_at: parse_datetime(&added_at, "added_at")?,
    })
}

impl Database {
    /// Persist imported names under a scope. `event_id` of `None` targets
    /// the global list. Names already present in the scope are skipped.
    pub async fn add_exclusion_names(
        &self,
        event_id: Option<String>,
        names: Vec<String>,
    ) -> Result<usize> {
        self.execute(move |conn| {
            let now = Utc::now().to_rfc3339();
            let mut inserted = 0;
            for name in names {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let exists: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM exclusion_entries
                     WHERE name = ?1 COLLATE NOCASE AND event_id IS ?2",
                    params![trimmed, event_id],
                    |row| row.get(0),
                )?;
                if exists > 0 {
                    continue;
                }
                conn.execute(
                    "INSERT INTO exclusion_entries (event_id, name, added_at)
                     VALUES (?1, ?2, ?3)",
                    params![event_id, trimmed, now],
                )?;
                inserted += 1;
            }
            Ok(inserted)
        })
        .await
    }

    pub async fn list_exclusion_entries(
        &self,
        event_id: Option<String>,
    ) -> Result<Vec<ExclusionEntry>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, event_id, name, added_at
                 FROM exclusion_entries
                 WHERE event_id IS ?1
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query(params![event_id])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }
            Ok(entries)
        })
        .await
    }

    /// Load a scope's names as a matchable list.
    pub async fn load_exclusion_list(&self, event_id: Option<String>) -> Result<ExclusionList> {
        let entries = self.list_exclusion_entries(event_id).await?;
        Ok(ExclusionList::new(entries.into_iter().map(|e| e.name)))
    }
}
