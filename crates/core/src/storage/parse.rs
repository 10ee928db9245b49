//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{AllocationStatus, Gender, PaymentStatus, RoomStatus};

fn conversion_error(what: &str, value: &str) -> SqlError {
    SqlError::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        format!("invalid {}: {:?}", what, value).into(),
    )
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| {
        SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse an optional UUID from a database string column
pub fn parse_uuid_opt(s: Option<String>) -> Result<Option<Uuid>, SqlError> {
    s.map(|s| parse_uuid(&s)).transpose()
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a stored gender value
pub fn parse_gender(s: &str) -> Result<Gender, SqlError> {
    match s {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => Err(conversion_error("gender", other)),
    }
}

/// Parse a stored payment status
pub fn parse_payment_status(s: &str) -> Result<PaymentStatus, SqlError> {
    match s {
        "Verified" => Ok(PaymentStatus::Verified),
        "Pending" => Ok(PaymentStatus::Pending),
        other => Err(conversion_error("payment status", other)),
    }
}

/// Parse a stored room status
pub fn parse_room_status(s: &str) -> Result<RoomStatus, SqlError> {
    match s {
        "available" => Ok(RoomStatus::Available),
        "full" => Ok(RoomStatus::Full),
        other => Err(conversion_error("room status", other)),
    }
}

/// Parse a stored allocation status
pub fn parse_allocation_status(s: &str) -> Result<AllocationStatus, SqlError> {
    match s {
        "active" => Ok(AllocationStatus::Active),
        "cancelled" => Ok(AllocationStatus::Cancelled),
        other => Err(conversion_error("allocation status", other)),
    }
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
