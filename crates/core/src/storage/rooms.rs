//! Room storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_room_status, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Room, RoomStatus};

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

const ROOM_COLUMNS: &str = "id, hall_id, room_number, capacity, current_occupants, room_status, \
                            is_under_maintenance, created_at, updated_at";

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hall_id: parse_uuid(&row.get::<_, String>(1)?)?,
        room_number: row.get(2)?,
        capacity: row.get(3)?,
        current_occupants: row.get(4)?,
        room_status: parse_room_status(&row.get::<_, String>(5)?)?,
        is_under_maintenance: row.get::<_, i32>(6)? != 0,
        created_at: parse_datetime(&row.get::<_, String>(7)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(8)?)?,
    })
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new room (administrative provisioning)
    #[instrument(skip(self, room), fields(room_number = %room.room_number))]
    pub fn create(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "INSERT INTO rooms (id, hall_id, room_number, capacity, current_occupants,
                                room_status, is_under_maintenance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                room.id.to_string(),
                room.hall_id.to_string(),
                room.room_number,
                room.capacity,
                room.current_occupants,
                room.room_status.as_str(),
                room.is_under_maintenance as i32,
                room.created_at.to_rfc3339(),
                room.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find room by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM rooms WHERE id = ?1", ROOM_COLUMNS))?;

        let room = stmt
            .query_row(params![id.to_string()], room_from_row)
            .optional()?;

        Ok(room)
    }

    /// List rooms in a hall in selection order
    #[instrument(skip(self))]
    pub fn list_for_hall(&self, hall_id: Uuid) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM rooms WHERE hall_id = ?1 ORDER BY room_number",
            ROOM_COLUMNS
        ))?;

        let rooms = stmt
            .query_map(params![hall_id.to_string()], room_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rooms)
    }

    /// Sequential selection: the first room in the hall with spare capacity
    /// and not under maintenance, lowest room number first. The ordering is
    /// a deliberate tie-break and must stay deterministic.
    #[instrument(skip(self))]
    pub fn first_with_vacancy(&self, hall_id: Uuid) -> Result<Option<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM rooms
             WHERE hall_id = ?1
               AND current_occupants < capacity
               AND is_under_maintenance = 0
             ORDER BY room_number
             LIMIT 1",
            ROOM_COLUMNS
        ))?;

        let room = stmt
            .query_row(params![hall_id.to_string()], room_from_row)
            .optional()?;

        Ok(room)
    }

    /// Increment the occupant counter by one. The CHECK constraint on the
    /// column rejects any increment past capacity.
    #[instrument(skip(self))]
    pub fn add_occupant(&self, room_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE rooms SET current_occupants = current_occupants + 1, updated_at = ?1
             WHERE id = ?2",
            params![Utc::now().to_rfc3339(), room_id.to_string()],
        )?;
        Ok(())
    }

    /// Mark a room full once its last bed is taken
    #[instrument(skip(self))]
    pub fn mark_full(&self, room_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE rooms SET room_status = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                RoomStatus::Full.as_str(),
                Utc::now().to_rfc3339(),
                room_id.to_string()
            ],
        )?;
        Ok(())
    }

    /// Set the maintenance flag. Only called by the maintenance toggle
    /// inside its transaction.
    #[instrument(skip(self))]
    pub fn set_maintenance(&self, room_id: Uuid, under_maintenance: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE rooms SET is_under_maintenance = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                under_maintenance as i32,
                Utc::now().to_rfc3339(),
                room_id.to_string()
            ],
        )?;
        Ok(())
    }
}
