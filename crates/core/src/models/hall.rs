//! Hall model - a dormitory building grouping rooms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Gender;

/// A Hall is a gendered dormitory building containing bookable rooms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub total_rooms: u32,
    /// Denormalized count of rooms that are not yet full. Decremented inside
    /// the booking transaction when a room transitions to full; repaired by
    /// the reconciliation routine if it ever drifts.
    pub available_rooms: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hall {
    pub fn new(name: String, gender: Gender, total_rooms: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            gender,
            total_rooms,
            available_rooms: total_rooms,
            created_at: now,
            updated_at: now,
        }
    }
}
