//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Halls table
            CREATE TABLE IF NOT EXISTS halls (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                gender TEXT NOT NULL,
                total_rooms INTEGER NOT NULL,
                -- Cache of rooms that are not yet full; maintained inside the
                -- booking transaction, repaired by reconciliation
                available_rooms INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Rooms table
            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                hall_id TEXT NOT NULL,
                room_number TEXT NOT NULL,
                capacity INTEGER NOT NULL CHECK (capacity > 0),
                current_occupants INTEGER NOT NULL DEFAULT 0
                    CHECK (current_occupants >= 0 AND current_occupants <= capacity),
                room_status TEXT NOT NULL DEFAULT 'available',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (hall_id) REFERENCES halls(id),
                UNIQUE(hall_id, room_number)
            );

            -- Students table
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                matric_number TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                department TEXT,
                level TEXT,
                gender TEXT NOT NULL,
                payment_status TEXT NOT NULL DEFAULT 'Pending',
                hall_selected TEXT,
                room_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (hall_selected) REFERENCES halls(id),
                FOREIGN KEY (room_id) REFERENCES rooms(id)
            );

            -- Payments table
            CREATE TABLE IF NOT EXISTS payments (
                id TEXT PRIMARY KEY,
                matric_number TEXT NOT NULL,
                payment_reference TEXT NOT NULL UNIQUE,
                amount_paid INTEGER NOT NULL,
                payment_status TEXT NOT NULL DEFAULT 'Pending',
                date_paid TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (matric_number) REFERENCES students(matric_number)
            );

            -- Receipts table (immutable once written)
            CREATE TABLE IF NOT EXISTS receipts (
                id TEXT PRIMARY KEY,
                matric_number TEXT NOT NULL,
                student_name TEXT NOT NULL,
                payment_reference TEXT NOT NULL,
                amount_paid INTEGER NOT NULL,
                verified INTEGER NOT NULL DEFAULT 0,
                date_paid TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (matric_number) REFERENCES students(matric_number)
            );

            -- Allocations table
            CREATE TABLE IF NOT EXISTS allocations (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                room_id TEXT NOT NULL,
                receipt_id TEXT,
                status TEXT NOT NULL DEFAULT 'active',
                allocation_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (student_id) REFERENCES students(id),
                FOREIGN KEY (room_id) REFERENCES rooms(id),
                FOREIGN KEY (receipt_id) REFERENCES receipts(id)
            );

            -- At most one active allocation per student. This index is the
            -- last line of defense against a race that slips past the
            -- eligibility check.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_allocations_one_active
                ON allocations(student_id) WHERE status = 'active';

            -- Append-only audit trail
            CREATE TABLE IF NOT EXISTS logs (
                id TEXT PRIMARY KEY,
                action TEXT NOT NULL,
                actor TEXT NOT NULL,
                details TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            -- Room scan order for sequential selection
            CREATE INDEX IF NOT EXISTS idx_rooms_hall_number ON rooms(hall_id, room_number);

            -- Payment lookups by matric number
            CREATE INDEX IF NOT EXISTS idx_payments_matric ON payments(matric_number, payment_status);

            -- Allocation lookups
            CREATE INDEX IF NOT EXISTS idx_allocations_student ON allocations(student_id);
            CREATE INDEX IF NOT EXISTS idx_allocations_room ON allocations(room_id);

            -- Audit trail is read newest-first
            CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp);
            CREATE INDEX IF NOT EXISTS idx_logs_action ON logs(action);
        "#,
    },
    Migration {
        version: 3,
        description: "Add maintenance flag to rooms",
        sql: r#"
            -- Rooms under maintenance are excluded from selection entirely
            ALTER TABLE rooms ADD COLUMN is_under_maintenance INTEGER NOT NULL DEFAULT 0;
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;

            info!(version = migration.version, "Migration complete");
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}

/// The highest migration version this build knows about
#[cfg(test)]
pub(crate) fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run twice
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_sequential() {
        // Verify migrations are numbered sequentially
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }
}
