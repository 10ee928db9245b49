//! Room selector
//!
//! Picks the room a booking will fill, either an explicit choice or the
//! first fit in the hall. Selection only reads under the transaction's
//! lock; all mutation happens in the committer.

use rusqlite::Transaction;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Hall, Room};
use crate::storage::{HallStore, RoomStore};

pub(crate) fn select_room(
    tx: &Transaction<'_>,
    hall_id: Uuid,
    explicit_room: Option<Uuid>,
) -> Result<(Room, Hall)> {
    match explicit_room {
        Some(room_id) => select_explicit(tx, hall_id, room_id),
        None => select_first_fit(tx, hall_id),
    }
}

/// Explicit mode: the caller named a room; validate it can take one more
/// occupant.
fn select_explicit(tx: &Transaction<'_>, hall_id: Uuid, room_id: Uuid) -> Result<(Room, Hall)> {
    let room = RoomStore::new(tx)
        .find_by_id(room_id)?
        .ok_or(Error::RoomNotFound)?;

    invariants::assert_room_invariants(&room);

    if room.hall_id != hall_id {
        return Err(Error::RoomNotInHall);
    }
    if room.is_full() {
        return Err(Error::RoomFull);
    }
    if room.is_under_maintenance {
        return Err(Error::RoomUnderMaintenance);
    }

    // The room's hall exists by foreign key; a miss here means the hall id
    // never matched a real hall.
    let hall = HallStore::new(tx)
        .find_by_id(hall_id)?
        .ok_or(Error::RoomNotInHall)?;
    invariants::assert_hall_invariants(&hall);

    Ok((room, hall))
}

/// Sequential mode: first room with spare capacity and not under
/// maintenance, lowest room number first. Deterministic by design so that
/// "who gets which room" is reproducible.
fn select_first_fit(tx: &Transaction<'_>, hall_id: Uuid) -> Result<(Room, Hall)> {
    let hall = HallStore::new(tx)
        .find_by_id(hall_id)?
        .ok_or(Error::HallFull)?;
    invariants::assert_hall_invariants(&hall);

    let room = RoomStore::new(tx)
        .first_with_vacancy(hall_id)?
        .ok_or(Error::HallFull)?;
    invariants::assert_room_invariants(&room);

    Ok((room, hall))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::storage::Database;

    fn setup() -> (Database, Hall) {
        let db = Database::open_in_memory().unwrap();
        let hall = Hall::new("Peace Hall".into(), Gender::Female, 3);
        db.halls().create(&hall).unwrap();
        (db, hall)
    }

    #[test]
    fn test_explicit_selection_validates_hall_membership() {
        let (mut db, hall) = setup();
        let other_hall = Hall::new("Unity Hall".into(), Gender::Female, 1);
        db.halls().create(&other_hall).unwrap();

        let room = Room::new(other_hall.id, "101".into(), 2);
        db.rooms().create(&room).unwrap();

        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            select_room(&tx, hall.id, Some(room.id)),
            Err(Error::RoomNotInHall)
        ));
    }

    #[test]
    fn test_explicit_selection_rejects_full_room() {
        let (mut db, hall) = setup();
        let mut room = Room::new(hall.id, "101".into(), 1);
        room.current_occupants = 1;
        room.room_status = crate::models::RoomStatus::Full;
        db.rooms().create(&room).unwrap();

        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            select_room(&tx, hall.id, Some(room.id)),
            Err(Error::RoomFull)
        ));
    }

    #[test]
    fn test_explicit_selection_rejects_maintenance() {
        let (mut db, hall) = setup();
        let room = Room::new(hall.id, "101".into(), 2);
        db.rooms().create(&room).unwrap();
        db.rooms().set_maintenance(room.id, true).unwrap();

        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            select_room(&tx, hall.id, Some(room.id)),
            Err(Error::RoomUnderMaintenance)
        ));
    }

    #[test]
    fn test_explicit_selection_unknown_room() {
        let (mut db, hall) = setup();
        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            select_room(&tx, hall.id, Some(Uuid::new_v4())),
            Err(Error::RoomNotFound)
        ));
    }

    #[test]
    fn test_first_fit_takes_lowest_room_number() {
        let (mut db, hall) = setup();
        db.rooms().create(&Room::new(hall.id, "102".into(), 1)).unwrap();
        db.rooms().create(&Room::new(hall.id, "101".into(), 1)).unwrap();

        let tx = db.immediate_transaction().unwrap();
        let (room, selected_hall) = select_room(&tx, hall.id, None).unwrap();
        assert_eq!(room.room_number, "101");
        assert_eq!(selected_hall.id, hall.id);
    }

    #[test]
    fn test_first_fit_empty_hall_is_full() {
        let (mut db, hall) = setup();
        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            select_room(&tx, hall.id, None),
            Err(Error::HallFull)
        ));
    }
}
