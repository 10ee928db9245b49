//! Maintenance toggle
//!
//! Flips a room's maintenance flag and appends the audit entry in the same
//! transaction, so the trail is never out of sync with the flag. The
//! selector observes the flag under the same transaction discipline, so a
//! toggled room drops out of (or returns to) the candidate set immediately.

use rusqlite::Transaction;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{LogEntry, MaintenanceLogDetails};
use crate::storage::{AuditStore, HallStore, RoomStore};

/// Audit log action name for maintenance toggles
pub const MAINTENANCE_TOGGLE_ACTION: &str = "maintenance_toggle";

/// Result of a maintenance toggle
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceChange {
    pub room_number: String,
    pub hall_name: String,
    pub is_under_maintenance: bool,
}

pub(crate) fn toggle(
    tx: &Transaction<'_>,
    room_id: Uuid,
    actor: &str,
) -> Result<MaintenanceChange> {
    let rooms = RoomStore::new(tx);
    let room = rooms.find_by_id(room_id)?.ok_or(Error::RoomNotFound)?;
    let hall = HallStore::new(tx)
        .find_by_id(room.hall_id)?
        .ok_or(Error::RoomNotFound)?;

    let old_value = room.is_under_maintenance;
    let new_value = !old_value;
    rooms.set_maintenance(room.id, new_value)?;

    let details = MaintenanceLogDetails {
        room_id: room.id,
        room_number: room.room_number.clone(),
        hall_name: hall.name.clone(),
        old_value,
        new_value,
    };
    AuditStore::new(tx).append(&LogEntry::new(
        MAINTENANCE_TOGGLE_ACTION,
        actor,
        serde_json::to_value(&details)?,
    ))?;

    Ok(MaintenanceChange {
        room_number: room.room_number,
        hall_name: hall.name,
        is_under_maintenance: new_value,
    })
}
