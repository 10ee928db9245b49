//! Hall storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_gender, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Gender, Hall};

pub struct HallStore<'a> {
    conn: &'a Connection,
}

const HALL_COLUMNS: &str = "id, name, gender, total_rooms, available_rooms, created_at, updated_at";

fn hall_from_row(row: &Row<'_>) -> rusqlite::Result<Hall> {
    Ok(Hall {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        gender: parse_gender(&row.get::<_, String>(2)?)?,
        total_rooms: row.get(3)?,
        available_rooms: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

impl<'a> HallStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new hall (administrative provisioning)
    #[instrument(skip(self, hall), fields(hall_name = %hall.name))]
    pub fn create(&self, hall: &Hall) -> Result<()> {
        self.conn.execute(
            "INSERT INTO halls (id, name, gender, total_rooms, available_rooms, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                hall.id.to_string(),
                hall.name,
                hall.gender.as_str(),
                hall.total_rooms,
                hall.available_rooms,
                hall.created_at.to_rfc3339(),
                hall.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find hall by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Hall>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM halls WHERE id = ?1", HALL_COLUMNS))?;

        let hall = stmt
            .query_row(params![id.to_string()], hall_from_row)
            .optional()?;

        Ok(hall)
    }

    /// List all halls ordered by name
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Hall>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM halls ORDER BY name", HALL_COLUMNS))?;

        let halls = stmt
            .query_map([], hall_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(halls)
    }

    /// Halls a student of the given gender can still book into
    #[instrument(skip(self))]
    pub fn list_with_vacancies(&self, gender: Gender) -> Result<Vec<Hall>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM halls WHERE gender = ?1 AND available_rooms > 0 ORDER BY name",
            HALL_COLUMNS
        ))?;

        let halls = stmt
            .query_map(params![gender.as_str()], hall_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(halls)
    }

    /// Decrement the available-rooms cache when a room transitions to full.
    /// Clamped at zero so counter drift can never underflow the column.
    #[instrument(skip(self))]
    pub fn decrement_available_rooms(&self, hall_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE halls SET available_rooms = MAX(available_rooms - 1, 0), updated_at = ?1
             WHERE id = ?2",
            params![Utc::now().to_rfc3339(), hall_id.to_string()],
        )?;
        Ok(())
    }

    /// Derive the true not-full room count for a hall from the room rows.
    /// Used by reconciliation to audit the `available_rooms` cache.
    #[instrument(skip(self))]
    pub fn derive_available_rooms(&self, hall_id: Uuid) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM rooms WHERE hall_id = ?1 AND current_occupants < capacity",
            params![hall_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Overwrite the available-rooms cache with a recomputed value
    #[instrument(skip(self))]
    pub fn set_available_rooms(&self, hall_id: Uuid, available_rooms: u32) -> Result<()> {
        self.conn.execute(
            "UPDATE halls SET available_rooms = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                available_rooms,
                Utc::now().to_rfc3339(),
                hall_id.to_string()
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Room;
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let hall = Hall::new("Peace Hall".into(), Gender::Female, 3);
        db.halls().create(&hall).unwrap();

        let found = db.halls().find_by_id(hall.id).unwrap().unwrap();
        assert_eq!(found.name, "Peace Hall");
        assert_eq!(found.available_rooms, 3);
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let db = Database::open_in_memory().unwrap();
        let hall = Hall::new("Unity Hall".into(), Gender::Male, 1);
        db.halls().create(&hall).unwrap();

        db.halls().decrement_available_rooms(hall.id).unwrap();
        db.halls().decrement_available_rooms(hall.id).unwrap();

        let found = db.halls().find_by_id(hall.id).unwrap().unwrap();
        assert_eq!(found.available_rooms, 0);
    }

    #[test]
    fn test_list_with_vacancies_filters_gender_and_fullness() {
        let db = Database::open_in_memory().unwrap();
        let female = Hall::new("Peace Hall".into(), Gender::Female, 2);
        let male = Hall::new("Unity Hall".into(), Gender::Male, 2);
        let mut full = Hall::new("Faith Hall".into(), Gender::Female, 2);
        full.available_rooms = 0;

        db.halls().create(&female).unwrap();
        db.halls().create(&male).unwrap();
        db.halls().create(&full).unwrap();

        let open = db.halls().list_with_vacancies(Gender::Female).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].name, "Peace Hall");
    }

    #[test]
    fn test_derive_available_rooms() {
        let db = Database::open_in_memory().unwrap();
        let hall = Hall::new("Peace Hall".into(), Gender::Female, 2);
        db.halls().create(&hall).unwrap();

        let open = Room::new(hall.id, "101".into(), 2);
        let mut full = Room::new(hall.id, "102".into(), 1);
        full.current_occupants = 1;

        db.rooms().create(&open).unwrap();
        db.rooms().create(&full).unwrap();

        assert_eq!(db.halls().derive_available_rooms(hall.id).unwrap(), 1);
    }
}
