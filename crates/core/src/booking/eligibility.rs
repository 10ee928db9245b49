//! Eligibility checker
//!
//! Runs first inside the booking transaction. Loading the student row under
//! the transaction's writer lock serializes concurrent attempts by the same
//! student: the loser re-reads the winner's committed state.

use rusqlite::Transaction;

use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{PaymentStatus, Student};
use crate::storage::StudentStore;

/// Assert the student may book: exists, holds no room, payment verified.
/// No side effects on failure.
pub(crate) fn check_student(tx: &Transaction<'_>, matric_number: &str) -> Result<Student> {
    let student = StudentStore::new(tx)
        .find_by_matric(matric_number)?
        .ok_or(Error::StudentNotFound)?;

    invariants::assert_student_invariants(&student);

    if student.has_room() {
        return Err(Error::AlreadyAllocated);
    }

    if student.payment_status != PaymentStatus::Verified {
        return Err(Error::PaymentNotVerified);
    }

    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Hall, Room};
    use crate::storage::Database;

    fn verified_student(db: &Database, matric: &str) -> Student {
        let student = Student::new(
            matric.into(),
            "Ada Obi".into(),
            format!("{}@example.edu", matric.replace('/', ".")),
            Gender::Female,
        )
        .with_payment_verified();
        db.students().create(&student).unwrap();
        student
    }

    #[test]
    fn test_eligible_student_passes() {
        let mut db = Database::open_in_memory().unwrap();
        verified_student(&db, "CSC/2020/001");

        let tx = db.immediate_transaction().unwrap();
        let student = check_student(&tx, "CSC/2020/001").unwrap();
        assert_eq!(student.matric_number, "CSC/2020/001");
    }

    #[test]
    fn test_unknown_student() {
        let mut db = Database::open_in_memory().unwrap();
        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            check_student(&tx, "CSC/2020/404"),
            Err(Error::StudentNotFound)
        ));
    }

    #[test]
    fn test_unverified_payment_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let student = Student::new(
            "CSC/2020/002".into(),
            "Bola Ade".into(),
            "bola@example.edu".into(),
            Gender::Male,
        );
        db.students().create(&student).unwrap();

        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            check_student(&tx, "CSC/2020/002"),
            Err(Error::PaymentNotVerified)
        ));
    }

    #[test]
    fn test_student_with_room_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let hall = Hall::new("Peace Hall".into(), Gender::Female, 1);
        db.halls().create(&hall).unwrap();
        let room = Room::new(hall.id, "101".into(), 2);
        db.rooms().create(&room).unwrap();

        let student = verified_student(&db, "CSC/2020/003");
        db.students().assign_room(student.id, room.id, hall.id).unwrap();

        let tx = db.immediate_transaction().unwrap();
        assert!(matches!(
            check_student(&tx, "CSC/2020/003"),
            Err(Error::AlreadyAllocated)
        ));
    }
}
