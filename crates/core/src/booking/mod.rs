//! Room booking engine
//!
//! The transactional core: eligibility check, room selection, and the
//! allocation commit all run inside one immediate transaction, so every
//! concurrent booking observes either none or all of another booking's
//! mutations. The notifier runs strictly after commit.

mod committer;
mod eligibility;
mod maintenance;
mod reconcile;
mod selector;

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::storage::Database;

pub use maintenance::{MaintenanceChange, MAINTENANCE_TOGGLE_ACTION};
pub use reconcile::{HallDrift, ReconciliationReport};

/// A booking request as received from the outer API layer
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub matric_number: String,
    pub hall_id: Uuid,
    /// Explicit room choice; `None` selects sequentially (first fit,
    /// lowest room number)
    pub room_id: Option<Uuid>,
}

impl BookingRequest {
    pub fn first_fit(matric_number: impl Into<String>, hall_id: Uuid) -> Self {
        Self {
            matric_number: matric_number.into(),
            hall_id,
            room_id: None,
        }
    }

    pub fn explicit(matric_number: impl Into<String>, hall_id: Uuid, room_id: Uuid) -> Self {
        Self {
            matric_number: matric_number.into(),
            hall_id,
            room_id: Some(room_id),
        }
    }
}

/// What the caller gets back once a booking is durable
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub room_number: String,
    pub hall_name: String,
    pub receipt_id: Uuid,
    pub transaction_ref: String,
    pub amount_paid: i64,
}

/// The room allocation transaction engine.
///
/// Owns one database connection; concurrent bookings run one engine per
/// connection against the same database file.
pub struct BookingEngine {
    db: Database,
}

impl BookingEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Read-side access for reports and collaborators
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Book a room for a student.
    ///
    /// Eligibility, selection, and commit run in one transaction; the
    /// notifier is invoked only after the transaction is durable, and its
    /// failure never surfaces as a booking failure.
    #[instrument(skip(self, notifier), fields(matric = %request.matric_number))]
    pub fn book_room(
        &mut self,
        request: &BookingRequest,
        notifier: &dyn Notifier,
    ) -> Result<BookingConfirmation> {
        validate_request(request)?;

        let tx = self.db.immediate_transaction()?;
        let student = eligibility::check_student(&tx, &request.matric_number)?;
        let (room, hall) = selector::select_room(&tx, request.hall_id, request.room_id)?;
        let outcome = committer::commit_allocation(&tx, &student, &room, &hall)?;
        tx.commit()?;

        info!(
            room = %outcome.confirmation.room_number,
            hall = %outcome.confirmation.hall_name,
            reference = %outcome.confirmation.transaction_ref,
            "Room booked"
        );

        // The booking is already durable at this point.
        if let Err(e) = notifier.allocation_confirmed(&outcome.notice) {
            warn!(error = %e, "Allocation notice failed; booking unaffected");
        }

        Ok(outcome.confirmation)
    }

    /// Standalone eligibility check for the outer API layer. Same
    /// validation the booking path runs, without selecting or committing.
    #[instrument(skip(self))]
    pub fn check_eligibility(&mut self, matric_number: &str) -> Result<()> {
        if matric_number.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "matriculation number is required".into(),
            ));
        }

        let tx = self.db.immediate_transaction()?;
        eligibility::check_student(&tx, matric_number)?;
        // Read-only; dropping the transaction rolls it back.
        Ok(())
    }

    /// Flip a room's maintenance flag, auditing the change in the same
    /// transaction. `actor` is the request-scoped admin identity.
    #[instrument(skip(self))]
    pub fn toggle_maintenance(&mut self, room_id: Uuid, actor: &str) -> Result<MaintenanceChange> {
        if actor.trim().is_empty() {
            return Err(Error::InvalidRequest("actor identity is required".into()));
        }

        let tx = self.db.immediate_transaction()?;
        let change = maintenance::toggle(&tx, room_id, actor)?;
        tx.commit()?;

        info!(
            room = %change.room_number,
            hall = %change.hall_name,
            under_maintenance = change.is_under_maintenance,
            actor,
            "Maintenance flag toggled"
        );

        Ok(change)
    }

    /// Recompute every hall's available-rooms cache from the room rows,
    /// repairing any drift.
    #[instrument(skip(self))]
    pub fn reconcile_available_rooms(&mut self) -> Result<ReconciliationReport> {
        let tx = self.db.immediate_transaction()?;
        let report = reconcile::run(&tx)?;
        tx.commit()?;
        Ok(report)
    }
}

fn validate_request(request: &BookingRequest) -> Result<()> {
    if request.matric_number.trim().is_empty() {
        return Err(Error::InvalidRequest(
            "matriculation number is required".into(),
        ));
    }
    if request.hall_id.is_nil() {
        return Err(Error::InvalidRequest("hall id is required".into()));
    }
    if request.room_id == Some(Uuid::nil()) {
        return Err(Error::InvalidRequest("room id must not be nil".into()));
    }
    Ok(())
}
