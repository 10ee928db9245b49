//! Allocation committer
//!
//! Applies every mutation of a booking as one unit inside the caller's
//! transaction: occupancy counter, hall availability cache, student link,
//! receipt, allocation record. Any failure aborts the transaction and none
//! of it becomes visible.

use rusqlite::Transaction;
use tracing::warn;

use super::BookingConfirmation;
use crate::error::Result;
use crate::models::{Allocation, Hall, Receipt, Room, Student};
use crate::notify::AllocationNotice;
use crate::storage::{AllocationStore, HallStore, PaymentStore, ReceiptStore, RoomStore, StudentStore};

pub(crate) struct CommitOutcome {
    pub confirmation: BookingConfirmation,
    pub notice: AllocationNotice,
}

pub(crate) fn commit_allocation(
    tx: &Transaction<'_>,
    student: &Student,
    room: &Room,
    hall: &Hall,
) -> Result<CommitOutcome> {
    let rooms = RoomStore::new(tx);

    // The selector already validated spare capacity; the CHECK constraint
    // backs this up at the storage layer.
    rooms.add_occupant(room.id)?;
    let occupants_after = room.current_occupants + 1;

    if occupants_after == room.capacity {
        rooms.mark_full(room.id)?;
        HallStore::new(tx).decrement_available_rooms(hall.id)?;
    }

    StudentStore::new(tx).assign_room(student.id, room.id, hall.id)?;

    let reference = Receipt::generate_reference();
    let amount_paid = match PaymentStore::new(tx).latest_verified(&student.matric_number)? {
        Some(payment) => payment.amount_paid,
        None => {
            // A verified payment_status with no matching payment row still
            // books, with a zero-amount receipt. Flagged loudly so it can
            // be audited.
            warn!(
                matric = %student.matric_number,
                "No verified payment on record at allocation; receipt amount defaults to zero"
            );
            0
        }
    };

    let receipt = Receipt::new(student, reference.clone(), amount_paid);
    ReceiptStore::new(tx).create(&receipt)?;

    // Last line of defense: the partial unique index on active allocations
    // turns a race that slipped past the eligibility check into a Conflict,
    // rolling back steps 1-6 with it.
    let allocation = Allocation::new(student.id, room.id, Some(receipt.id));
    AllocationStore::new(tx).create(&allocation)?;

    Ok(CommitOutcome {
        confirmation: BookingConfirmation {
            room_number: room.room_number.clone(),
            hall_name: hall.name.clone(),
            receipt_id: receipt.id,
            transaction_ref: reference.clone(),
            amount_paid,
        },
        notice: AllocationNotice {
            student_email: student.email.clone(),
            student_name: student.full_name.clone(),
            hall_name: hall.name.clone(),
            room_number: room.room_number.clone(),
            receipt_id: receipt.id,
            transaction_ref: reference,
            amount_paid,
            allocation_date: allocation.allocation_date,
        },
    })
}
