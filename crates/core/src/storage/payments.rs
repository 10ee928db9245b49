//! Payment storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::parse::{parse_datetime, parse_payment_status, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Payment, PaymentStatus};

pub struct PaymentStore<'a> {
    conn: &'a Connection,
}

const PAYMENT_COLUMNS: &str =
    "id, matric_number, payment_reference, amount_paid, payment_status, date_paid, created_at";

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        matric_number: row.get(1)?,
        payment_reference: row.get(2)?,
        amount_paid: row.get(3)?,
        payment_status: parse_payment_status(&row.get::<_, String>(4)?)?,
        date_paid: parse_datetime(&row.get::<_, String>(5)?)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

impl<'a> PaymentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Record a payment
    #[instrument(skip(self, payment), fields(reference = %payment.payment_reference))]
    pub fn create(&self, payment: &Payment) -> Result<()> {
        self.conn.execute(
            "INSERT INTO payments (id, matric_number, payment_reference, amount_paid,
                                   payment_status, date_paid, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                payment.id.to_string(),
                payment.matric_number,
                payment.payment_reference,
                payment.amount_paid,
                payment.payment_status.as_str(),
                payment.date_paid.to_rfc3339(),
                payment.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// The student's most recent verified payment, if any. The committer
    /// reads this to stamp the allocation receipt with an amount.
    #[instrument(skip(self))]
    pub fn latest_verified(&self, matric_number: &str) -> Result<Option<Payment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM payments
             WHERE matric_number = ?1 AND payment_status = ?2
             ORDER BY date_paid DESC
             LIMIT 1",
            PAYMENT_COLUMNS
        ))?;

        let payment = stmt
            .query_row(
                params![matric_number, PaymentStatus::Verified.as_str()],
                payment_from_row,
            )
            .optional()?;

        Ok(payment)
    }
}
