//! Payment model - hostel fee payments recorded against a matric number

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaymentStatus;

/// A hostel fee payment. Amounts are stored in minor units (kobo) to avoid
/// floating-point drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub matric_number: String,
    /// Bank/gateway transaction reference, unique
    pub payment_reference: String,
    pub amount_paid: i64,
    pub payment_status: PaymentStatus,
    pub date_paid: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(matric_number: String, payment_reference: String, amount_paid: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            matric_number,
            payment_reference,
            amount_paid,
            payment_status: PaymentStatus::Pending,
            date_paid: now,
            created_at: now,
        }
    }

    pub fn verified(mut self) -> Self {
        self.payment_status = PaymentStatus::Verified;
        self
    }
}
