//! Read-side reports
//!
//! Everything here goes through the repository traits, so reports work
//! against any storage that implements them. Reads run outside the booking
//! transaction; the slip reflects the latest committed state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Gender, Hall};
use crate::storage::Storage;

/// Printable proof of allocation for one student
#[derive(Debug, Clone, Serialize)]
pub struct AllocationSlip {
    pub student_name: String,
    pub matric_number: String,
    pub department: Option<String>,
    pub level: Option<String>,
    pub hall_name: String,
    pub room_number: String,
    pub transaction_ref: String,
    pub amount_paid: i64,
    pub allocation_date: DateTime<Utc>,
}

/// Build the allocation slip for a student, or report why one cannot be
/// produced.
pub fn allocation_slip<S: Storage>(store: &S, matric_number: &str) -> Result<AllocationSlip> {
    let student = store
        .find_student_by_matric(matric_number)?
        .ok_or(Error::StudentNotFound)?;
    let allocation = store
        .find_active_allocation(student.id)?
        .ok_or(Error::AllocationNotFound)?;
    let room = store
        .find_room_by_id(allocation.room_id)?
        .ok_or(Error::RoomNotFound)?;
    let hall = store
        .find_hall_by_id(room.hall_id)?
        .ok_or(Error::RoomNotFound)?;

    let (transaction_ref, amount_paid) = match allocation.receipt_id {
        Some(receipt_id) => match store.find_receipt_by_id(receipt_id)? {
            Some(receipt) => (receipt.payment_reference, receipt.amount_paid),
            None => (String::new(), 0),
        },
        None => (String::new(), 0),
    };

    Ok(AllocationSlip {
        student_name: student.full_name,
        matric_number: student.matric_number,
        department: student.department,
        level: student.level,
        hall_name: hall.name,
        room_number: room.room_number,
        transaction_ref,
        amount_paid,
        allocation_date: allocation.allocation_date,
    })
}

/// Halls of the given gender that still have at least one selectable room
pub fn open_halls<S: Storage>(store: &S, gender: Gender) -> Result<Vec<Hall>> {
    store.list_halls_with_vacancies(gender)
}

/// Per-hall occupancy line for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct HallOccupancy {
    pub hall_id: Uuid,
    pub hall_name: String,
    pub total_rooms: u32,
    pub available_rooms: u32,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_students: u64,
    pub allocated_students: u64,
    pub unallocated_students: u64,
    pub halls: Vec<HallOccupancy>,
}

pub fn dashboard_summary<S: Storage>(store: &S) -> Result<DashboardSummary> {
    let total_students = store.count_students()?;
    let allocated_students = store.count_allocated_students()?;

    let halls = store
        .list_halls()?
        .into_iter()
        .map(|hall| HallOccupancy {
            hall_id: hall.id,
            hall_name: hall.name,
            total_rooms: hall.total_rooms,
            available_rooms: hall.available_rooms,
        })
        .collect();

    Ok(DashboardSummary {
        total_students,
        allocated_students,
        unallocated_students: total_students.saturating_sub(allocated_students),
        halls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingEngine, BookingRequest};
    use crate::models::{Payment, Room, Student};
    use crate::notify::TracingNotifier;
    use crate::storage::Database;

    fn booked_engine() -> (BookingEngine, Hall) {
        let db = Database::open_in_memory().unwrap();
        let hall = Hall::new("Peace Hall".into(), Gender::Female, 2);
        db.halls().create(&hall).unwrap();
        db.rooms().create(&Room::new(hall.id, "101".into(), 2)).unwrap();
        db.rooms().create(&Room::new(hall.id, "102".into(), 2)).unwrap();

        let student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        )
        .with_department("Computer Science".into())
        .with_level("300".into())
        .with_payment_verified();
        db.students().create(&student).unwrap();
        db.payments()
            .create(&Payment::new("CSC/2020/001".into(), "PAY-1".into(), 85_000_00).verified())
            .unwrap();

        let mut engine = BookingEngine::new(db);
        engine
            .book_room(
                &BookingRequest::first_fit("CSC/2020/001", hall.id),
                &TracingNotifier,
            )
            .unwrap();
        (engine, hall)
    }

    #[test]
    fn test_allocation_slip_for_booked_student() {
        let (engine, _) = booked_engine();
        let slip = allocation_slip(engine.database(), "CSC/2020/001").unwrap();
        assert_eq!(slip.student_name, "Ada Obi");
        assert_eq!(slip.hall_name, "Peace Hall");
        assert_eq!(slip.room_number, "101");
        assert_eq!(slip.amount_paid, 85_000_00);
        assert_eq!(slip.department.as_deref(), Some("Computer Science"));
        assert!(slip.transaction_ref.starts_with("BU-HAMS-"));
    }

    #[test]
    fn test_allocation_slip_errors() {
        let (engine, _) = booked_engine();
        let db = engine.database();

        assert!(matches!(
            allocation_slip(db, "CSC/2020/404"),
            Err(Error::StudentNotFound)
        ));

        let unbooked = Student::new(
            "CSC/2020/002".into(),
            "Bola Ade".into(),
            "bola@example.edu".into(),
            Gender::Female,
        )
        .with_payment_verified();
        db.students().create(&unbooked).unwrap();
        assert!(matches!(
            allocation_slip(db, "CSC/2020/002"),
            Err(Error::AllocationNotFound)
        ));
    }

    #[test]
    fn test_open_halls_filters_by_gender_and_vacancy() {
        let db = Database::open_in_memory().unwrap();
        let female = Hall::new("Peace Hall".into(), Gender::Female, 1);
        let male = Hall::new("Unity Hall".into(), Gender::Male, 1);
        let mut full = Hall::new("Grace Hall".into(), Gender::Female, 1);
        full.available_rooms = 0;
        db.halls().create(&female).unwrap();
        db.halls().create(&male).unwrap();
        db.halls().create(&full).unwrap();

        let open = open_halls(&db, Gender::Female).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].name, "Peace Hall");
    }

    #[test]
    fn test_dashboard_summary_counts() {
        let (engine, hall) = booked_engine();
        let db = engine.database();

        let unbooked = Student::new(
            "CSC/2020/002".into(),
            "Bola Ade".into(),
            "bola@example.edu".into(),
            Gender::Female,
        );
        db.students().create(&unbooked).unwrap();

        let summary = dashboard_summary(db).unwrap();
        assert_eq!(summary.total_students, 2);
        assert_eq!(summary.allocated_students, 1);
        assert_eq!(summary.unallocated_students, 1);
        assert_eq!(summary.halls.len(), 1);
        assert_eq!(summary.halls[0].hall_id, hall.id);
        assert_eq!(summary.halls[0].available_rooms, 2);
    }
}
