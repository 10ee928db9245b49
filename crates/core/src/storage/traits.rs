//! Storage repository traits
//!
//! These traits define the read-side storage interface consumed by the
//! reporting layer and outer collaborators (HTTP handlers), allowing for
//! different implementations (SQLite, mock).

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Allocation, Gender, Hall, Receipt, Room, Student};

/// Student repository operations
pub trait StudentRepository {
    /// Find a student by matric number
    fn find_student_by_matric(&self, matric_number: &str) -> Result<Option<Student>>;

    /// Total number of registered students
    fn count_students(&self) -> Result<u64>;

    /// Number of students currently holding a room
    fn count_allocated_students(&self) -> Result<u64>;
}

/// Hall repository operations
pub trait HallRepository {
    /// Find a hall by ID
    fn find_hall_by_id(&self, id: Uuid) -> Result<Option<Hall>>;

    /// All halls ordered by name
    fn list_halls(&self) -> Result<Vec<Hall>>;

    /// Halls a student of the given gender can still book into
    fn list_halls_with_vacancies(&self, gender: Gender) -> Result<Vec<Hall>>;
}

/// Allocation repository operations
pub trait AllocationRepository {
    /// The student's active allocation, if any
    fn find_active_allocation(&self, student_id: Uuid) -> Result<Option<Allocation>>;

    /// Find a room by ID
    fn find_room_by_id(&self, id: Uuid) -> Result<Option<Room>>;

    /// Find a receipt by ID
    fn find_receipt_by_id(&self, id: Uuid) -> Result<Option<Receipt>>;
}

/// Combined storage interface
///
/// Provides access to all read-side repository operations.
pub trait Storage: StudentRepository + HallRepository + AllocationRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where T: StudentRepository + HallRepository + AllocationRepository {}
