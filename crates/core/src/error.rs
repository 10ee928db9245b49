//! Error types for HAMS Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// Constraint violation or lock contention. The whole request may be
    /// retried; no partial state was committed.
    #[error("Transient storage conflict: {0}")]
    Conflict(rusqlite::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Student not found")]
    StudentNotFound,

    #[error("Room not found")]
    RoomNotFound,

    #[error("No allocation found for this student")]
    AllocationNotFound,

    #[error("Student already has a room")]
    AlreadyAllocated,

    #[error("Payment not verified")]
    PaymentNotVerified,

    #[error("Room is already full")]
    RoomFull,

    #[error("The hall is fully booked")]
    HallFull,

    #[error("Room is under maintenance")]
    RoomUnderMaintenance,

    #[error("Room does not belong to the selected hall")]
    RoomNotInHall,

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller may safely retry the whole request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

// Constraint violations and lock waits that time out are mapped to
// `Conflict` so callers can distinguish "retry the request" from a broken
// database. Everything else stays a plain database error.
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(e, _) => match e.code {
                ErrorCode::ConstraintViolation
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked => Error::Conflict(err),
                _ => Error::Database(err),
            },
            _ => Error::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
