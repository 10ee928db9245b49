//! Allocation model - the durable student-to-room link

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    Active,
    Cancelled,
}

impl AllocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Active => "active",
            AllocationStatus::Cancelled => "cancelled",
        }
    }
}

/// Links one student to one room for one booking lifecycle. At most one
/// active allocation exists per student; the storage layer enforces this
/// with a partial unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub id: Uuid,
    pub student_id: Uuid,
    pub room_id: Uuid,
    pub receipt_id: Option<Uuid>,
    pub status: AllocationStatus,
    pub allocation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Allocation {
    pub fn new(student_id: Uuid, room_id: Uuid, receipt_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id,
            room_id,
            receipt_id,
            status: AllocationStatus::Active,
            allocation_date: now,
            created_at: now,
        }
    }
}
