//! Audit log storage
//!
//! Append-only. There are deliberately no update or delete operations here.

use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::parse::{parse_datetime, parse_uuid};
use crate::error::Result;
use crate::models::LogEntry;

pub struct AuditStore<'a> {
    conn: &'a Connection,
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    let details: String = row.get(3)?;
    Ok(LogEntry {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        action: row.get(1)?,
        actor: row.get(2)?,
        details: serde_json::from_str(&details).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        timestamp: parse_datetime(&row.get::<_, String>(4)?)?,
    })
}

impl<'a> AuditStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append one entry to the trail
    #[instrument(skip(self, entry), fields(action = %entry.action, actor = %entry.actor))]
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO logs (id, action, actor, details, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                entry.action,
                entry.actor,
                serde_json::to_string(&entry.details)?,
                entry.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recent entries, newest first
    #[instrument(skip(self))]
    pub fn list_recent(&self, limit: u32) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, action, actor, details, timestamp FROM logs
             ORDER BY timestamp DESC
             LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit], log_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries for one action name, newest first
    #[instrument(skip(self))]
    pub fn list_for_action(&self, action: &str) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, action, actor, details, timestamp FROM logs
             WHERE action = ?1
             ORDER BY timestamp DESC",
        )?;

        let entries = stmt
            .query_map(params![action], log_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use serde_json::json;

    #[test]
    fn test_append_and_list() {
        let db = Database::open_in_memory().unwrap();

        let entry = LogEntry::new(
            "maintenance_toggle",
            "warden@example.edu",
            json!({ "room_number": "101", "old_value": false, "new_value": true }),
        );
        db.audit().append(&entry).unwrap();

        let recent = db.audit().list_recent(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].actor, "warden@example.edu");
        assert_eq!(recent[0].details["new_value"], json!(true));

        let toggles = db.audit().list_for_action("maintenance_toggle").unwrap();
        assert_eq!(toggles.len(), 1);
        assert!(db.audit().list_for_action("something_else").unwrap().is_empty());
    }
}
