//! Student storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_datetime, parse_gender, parse_payment_status, parse_uuid, parse_uuid_opt, OptionalExt,
};
use crate::error::Result;
use crate::models::{PaymentStatus, Student};

pub struct StudentStore<'a> {
    conn: &'a Connection,
}

const STUDENT_COLUMNS: &str = "id, matric_number, full_name, email, department, level, gender, \
                               payment_status, hall_selected, room_id, created_at, updated_at";

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        matric_number: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        department: row.get(4)?,
        level: row.get(5)?,
        gender: parse_gender(&row.get::<_, String>(6)?)?,
        payment_status: parse_payment_status(&row.get::<_, String>(7)?)?,
        hall_selected: parse_uuid_opt(row.get::<_, Option<String>>(8)?)?,
        room_id: parse_uuid_opt(row.get::<_, Option<String>>(9)?)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(11)?)?,
    })
}

impl<'a> StudentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new student (administrative provisioning)
    #[instrument(skip(self, student), fields(matric = %student.matric_number))]
    pub fn create(&self, student: &Student) -> Result<()> {
        self.conn.execute(
            "INSERT INTO students (id, matric_number, full_name, email, department, level, gender,
                                   payment_status, hall_selected, room_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                student.id.to_string(),
                student.matric_number,
                student.full_name,
                student.email,
                student.department,
                student.level,
                student.gender.as_str(),
                student.payment_status.as_str(),
                student.hall_selected.map(|h| h.to_string()),
                student.room_id.map(|r| r.to_string()),
                student.created_at.to_rfc3339(),
                student.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find a student by matric number
    #[instrument(skip(self))]
    pub fn find_by_matric(&self, matric_number: &str) -> Result<Option<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM students WHERE matric_number = ?1",
            STUDENT_COLUMNS
        ))?;

        let student = stmt
            .query_row(params![matric_number], student_from_row)
            .optional()?;

        Ok(student)
    }

    /// Find a student by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM students WHERE id = ?1",
            STUDENT_COLUMNS
        ))?;

        let student = stmt
            .query_row(params![id.to_string()], student_from_row)
            .optional()?;

        Ok(student)
    }

    /// Link a student to the room and hall chosen for them. Only called by
    /// the allocation committer inside the booking transaction.
    #[instrument(skip(self))]
    pub fn assign_room(&self, student_id: Uuid, room_id: Uuid, hall_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE students SET room_id = ?1, hall_selected = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                room_id.to_string(),
                hall_id.to_string(),
                Utc::now().to_rfc3339(),
                student_id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Update a student's payment verification status
    #[instrument(skip(self))]
    pub fn set_payment_status(&self, student_id: Uuid, status: PaymentStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE students SET payment_status = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                status.as_str(),
                Utc::now().to_rfc3339(),
                student_id.to_string()
            ],
        )?;
        Ok(())
    }

    /// Total number of registered students
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of students holding a room
    pub fn count_allocated(&self) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM students WHERE room_id IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PaymentStatus};
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        db.students().create(&student).unwrap();

        let found = db.students().find_by_matric("CSC/2020/001").unwrap().unwrap();
        assert_eq!(found.id, student.id);
        assert_eq!(found.full_name, "Ada Obi");
        assert_eq!(found.payment_status, PaymentStatus::Pending);
        assert!(found.room_id.is_none());

        assert!(db.students().find_by_matric("CSC/2020/999").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_matric_rejected() {
        let db = Database::open_in_memory().unwrap();
        let a = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        let b = Student::new(
            "CSC/2020/001".into(),
            "Bola Ade".into(),
            "bola@example.edu".into(),
            Gender::Male,
        );
        db.students().create(&a).unwrap();
        assert!(db.students().create(&b).is_err());
    }

    #[test]
    fn test_set_payment_status() {
        let db = Database::open_in_memory().unwrap();
        let student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        db.students().create(&student).unwrap();

        db.students()
            .set_payment_status(student.id, PaymentStatus::Verified)
            .unwrap();
        let found = db.students().find_by_id(student.id).unwrap().unwrap();
        assert_eq!(found.payment_status, PaymentStatus::Verified);
    }

    #[test]
    fn test_counts() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.students().count().unwrap(), 0);

        let student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        db.students().create(&student).unwrap();

        assert_eq!(db.students().count().unwrap(), 1);
        assert_eq!(db.students().count_allocated().unwrap(), 0);
    }
}
