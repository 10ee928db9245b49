//! Audit log model - append-only trail of administrative mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audit trail entry. Entries are appended inside the same transaction
/// as the mutation they describe and are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    /// Short machine-readable action name, e.g. "maintenance_toggle"
    pub action: String,
    /// Request-scoped actor identity (admin email), never ambient state
    pub actor: String,
    /// Structured detail payload
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(action: &str, actor: &str, details: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.to_string(),
            actor: actor.to_string(),
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Detail payload recorded for every maintenance toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceLogDetails {
    pub room_id: Uuid,
    pub room_number: String,
    pub hall_name: String,
    pub old_value: bool,
    pub new_value: bool,
}
