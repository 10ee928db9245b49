//! Availability reconciliation
//!
//! The `halls.available_rooms` column is a cache maintained inside the
//! booking transaction. This routine recomputes it from the room rows as a
//! periodic consistency check instead of trusting the cache blindly.

use rusqlite::Transaction;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::HallStore;

/// One hall whose cached availability disagreed with the derived value
#[derive(Debug, Clone, Serialize)]
pub struct HallDrift {
    pub hall_id: Uuid,
    pub hall_name: String,
    pub cached: u32,
    pub derived: u32,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub halls_checked: u32,
    pub repaired: Vec<HallDrift>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.repaired.is_empty()
    }
}

pub(crate) fn run(tx: &Transaction<'_>) -> Result<ReconciliationReport> {
    let halls = HallStore::new(tx);
    let all = halls.list()?;
    let mut repaired = Vec::new();

    for hall in &all {
        let derived = halls.derive_available_rooms(hall.id)?;
        if derived != hall.available_rooms {
            info!(
                hall = %hall.name,
                cached = hall.available_rooms,
                derived,
                "Repairing available-rooms drift"
            );
            halls.set_available_rooms(hall.id, derived)?;
            repaired.push(HallDrift {
                hall_id: hall.id,
                hall_name: hall.name.clone(),
                cached: hall.available_rooms,
                derived,
            });
        }
    }

    Ok(ReconciliationReport {
        halls_checked: all.len() as u32,
        repaired,
    })
}
