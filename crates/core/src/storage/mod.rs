//! SQLite storage layer for HAMS
//!
//! One connection per engine; writers are serialized by immediate
//! transactions. Lock waits are bounded by the busy timeout and surface as
//! retryable conflicts rather than hangs.

mod allocations;
mod audit;
mod halls;
mod migrations;
mod parse;
mod payments;
mod receipts;
mod rooms;
mod students;
mod traits;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Allocation, Gender, Hall, Receipt, Room, Student};

pub use allocations::AllocationStore;
pub use audit::AuditStore;
pub use halls::HallStore;
pub use payments::PaymentStore;
pub use receipts::ReceiptStore;
pub use rooms::RoomStore;
pub use students::StudentStore;
pub use traits::{AllocationRepository, HallRepository, Storage, StudentRepository};

/// How long a connection waits on a writer lock before the storage engine
/// reports SQLITE_BUSY (surfaced as a retryable conflict).
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_busy_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open or create database with an explicit lock-wait bound
    pub fn open_with_busy_timeout<P: AsRef<Path>>(path: P, timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        conn.busy_timeout(timeout)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Begin an immediate transaction, taking the writer lock up front so
    /// every value read inside it is stable until commit.
    pub(crate) fn immediate_transaction(&mut self) -> Result<Transaction<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(tx)
    }

    /// Get student store
    pub fn students(&self) -> StudentStore<'_> {
        StudentStore::new(&self.conn)
    }

    /// Get hall store
    pub fn halls(&self) -> HallStore<'_> {
        HallStore::new(&self.conn)
    }

    /// Get room store
    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    /// Get payment store
    pub fn payments(&self) -> PaymentStore<'_> {
        PaymentStore::new(&self.conn)
    }

    /// Get receipt store
    pub fn receipts(&self) -> ReceiptStore<'_> {
        ReceiptStore::new(&self.conn)
    }

    /// Get allocation store
    pub fn allocations(&self) -> AllocationStore<'_> {
        AllocationStore::new(&self.conn)
    }

    /// Get audit log store
    pub fn audit(&self) -> AuditStore<'_> {
        AuditStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl StudentRepository for Database {
    fn find_student_by_matric(&self, matric_number: &str) -> Result<Option<Student>> {
        self.students().find_by_matric(matric_number)
    }

    fn count_students(&self) -> Result<u64> {
        self.students().count()
    }

    fn count_allocated_students(&self) -> Result<u64> {
        self.students().count_allocated()
    }
}

impl HallRepository for Database {
    fn find_hall_by_id(&self, id: Uuid) -> Result<Option<Hall>> {
        self.halls().find_by_id(id)
    }

    fn list_halls(&self) -> Result<Vec<Hall>> {
        self.halls().list()
    }

    fn list_halls_with_vacancies(&self, gender: Gender) -> Result<Vec<Hall>> {
        self.halls().list_with_vacancies(gender)
    }
}

impl AllocationRepository for Database {
    fn find_active_allocation(&self, student_id: Uuid) -> Result<Option<Allocation>> {
        self.allocations().find_active_for_student(student_id)
    }

    fn find_room_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        self.rooms().find_by_id(id)
    }

    fn find_receipt_by_id(&self, id: Uuid) -> Result<Option<Receipt>> {
        self.receipts().find_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_reports_latest_schema_version() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version(), migrations::latest_version());
    }
}
