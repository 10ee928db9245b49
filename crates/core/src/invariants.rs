//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{Hall, Room, RoomStatus, Student};

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(room.capacity > 0, "Room {} has zero capacity", room.id);

    debug_assert!(
        room.current_occupants <= room.capacity,
        "Room {} has {} occupants but capacity {}",
        room.id,
        room.current_occupants,
        room.capacity
    );

    // A room marked full must actually be full
    debug_assert!(
        !(room.room_status == RoomStatus::Full && room.current_occupants < room.capacity),
        "Room {} marked full with {} of {} beds taken",
        room.id,
        room.current_occupants,
        room.capacity
    );
}

/// Validate that a Student's placement state is internally consistent
pub fn assert_student_invariants(student: &Student) {
    debug_assert!(
        !student.matric_number.trim().is_empty(),
        "Student {} has empty matric number",
        student.id
    );

    // A room assignment always comes with a hall assignment
    debug_assert!(
        !(student.room_id.is_some() && student.hall_selected.is_none()),
        "Student {} has a room but no hall",
        student.id
    );
}

/// Validate that a Hall's state is internally consistent
pub fn assert_hall_invariants(hall: &Hall) {
    debug_assert!(
        !hall.name.trim().is_empty(),
        "Hall {} has empty name",
        hall.id
    );

    debug_assert!(
        hall.available_rooms <= hall.total_rooms,
        "Hall {} claims {} available of {} total rooms",
        hall.id,
        hall.available_rooms,
        hall.total_rooms
    );
}

/// Validate that a student's placement points at the given room's hall
pub fn assert_placement_consistent(student: &Student, room: &Room) {
    if student.room_id == Some(room.id) {
        debug_assert!(
            student.hall_selected == Some(room.hall_id),
            "Student {} is in room {} but hall_selected does not match the room's hall",
            student.id,
            room.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use uuid::Uuid;

    fn make_room() -> Room {
        Room::new(Uuid::new_v4(), "101".to_string(), 4)
    }

    #[test]
    fn test_valid_room() {
        let room = make_room();
        assert_room_invariants(&room);
    }

    #[test]
    fn test_full_room() {
        let mut room = make_room();
        room.current_occupants = room.capacity;
        room.room_status = RoomStatus::Full;
        assert_room_invariants(&room);
    }

    #[test]
    #[should_panic(expected = "occupants")]
    fn test_overfull_room_panics() {
        let mut room = make_room();
        room.current_occupants = room.capacity + 1;
        assert_room_invariants(&room);
    }

    #[test]
    #[should_panic(expected = "marked full")]
    fn test_prematurely_full_room_panics() {
        let mut room = make_room();
        room.room_status = RoomStatus::Full;
        room.current_occupants = 1;
        assert_room_invariants(&room);
    }

    #[test]
    fn test_valid_student() {
        let student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        assert_student_invariants(&student);
    }

    #[test]
    #[should_panic(expected = "no hall")]
    fn test_room_without_hall_panics() {
        let mut student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        student.room_id = Some(Uuid::new_v4());
        assert_student_invariants(&student);
    }

    #[test]
    fn test_valid_hall() {
        let hall = Hall::new("Peace Hall".into(), Gender::Female, 3);
        assert_hall_invariants(&hall);
    }

    #[test]
    #[should_panic(expected = "hall_selected")]
    fn test_placement_hall_mismatch_panics() {
        let room = make_room();
        let mut student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        student.room_id = Some(room.id);
        student.hall_selected = Some(Uuid::new_v4());
        assert_placement_consistent(&student, &room);
    }
}
