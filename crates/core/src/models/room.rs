//! Room model - a bookable unit with fixed bed capacity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Available,
    Full,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Full => "full",
        }
    }
}

/// A room within a hall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub hall_id: Uuid,
    /// Room number, unique within its hall. Stored as text; sequential
    /// selection orders on it ascending.
    pub room_number: String,
    pub capacity: u32,
    pub current_occupants: u32,
    pub room_status: RoomStatus,
    /// A room under maintenance is never selectable regardless of occupancy
    pub is_under_maintenance: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(hall_id: Uuid, room_number: String, capacity: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hall_id,
            room_number,
            capacity,
            current_occupants: 0,
            room_status: RoomStatus::Available,
            is_under_maintenance: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current_occupants >= self.capacity
    }
}
