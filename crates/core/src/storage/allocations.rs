//! Allocation storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_allocation_status, parse_datetime, parse_uuid, parse_uuid_opt, OptionalExt,
};
use crate::error::Result;
use crate::models::{Allocation, AllocationStatus};

pub struct AllocationStore<'a> {
    conn: &'a Connection,
}

const ALLOCATION_COLUMNS: &str =
    "id, student_id, room_id, receipt_id, status, allocation_date, created_at";

fn allocation_from_row(row: &Row<'_>) -> rusqlite::Result<Allocation> {
    Ok(Allocation {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        student_id: parse_uuid(&row.get::<_, String>(1)?)?,
        room_id: parse_uuid(&row.get::<_, String>(2)?)?,
        receipt_id: parse_uuid_opt(row.get::<_, Option<String>>(3)?)?,
        status: parse_allocation_status(&row.get::<_, String>(4)?)?,
        allocation_date: parse_datetime(&row.get::<_, String>(5)?)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

impl<'a> AllocationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert an allocation. The partial unique index on
    /// `(student_id) WHERE status = 'active'` rejects a second active
    /// allocation for the same student.
    #[instrument(skip(self, allocation), fields(student_id = %allocation.student_id))]
    pub fn create(&self, allocation: &Allocation) -> Result<()> {
        self.conn.execute(
            "INSERT INTO allocations (id, student_id, room_id, receipt_id, status,
                                      allocation_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                allocation.id.to_string(),
                allocation.student_id.to_string(),
                allocation.room_id.to_string(),
                allocation.receipt_id.map(|r| r.to_string()),
                allocation.status.as_str(),
                allocation.allocation_date.to_rfc3339(),
                allocation.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The student's active allocation, if one exists
    #[instrument(skip(self))]
    pub fn find_active_for_student(&self, student_id: Uuid) -> Result<Option<Allocation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM allocations WHERE student_id = ?1 AND status = ?2",
            ALLOCATION_COLUMNS
        ))?;

        let allocation = stmt
            .query_row(
                params![student_id.to_string(), AllocationStatus::Active.as_str()],
                allocation_from_row,
            )
            .optional()?;

        Ok(allocation)
    }
}
