//! Receipt storage operations
//!
//! Receipts are written once by the allocation committer and never updated.

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Receipt;

pub struct ReceiptStore<'a> {
    conn: &'a Connection,
}

const RECEIPT_COLUMNS: &str = "id, matric_number, student_name, payment_reference, amount_paid, \
                               verified, date_paid, created_at";

fn receipt_from_row(row: &Row<'_>) -> rusqlite::Result<Receipt> {
    Ok(Receipt {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        matric_number: row.get(1)?,
        student_name: row.get(2)?,
        payment_reference: row.get(3)?,
        amount_paid: row.get(4)?,
        verified: row.get::<_, i32>(5)? != 0,
        date_paid: parse_datetime(&row.get::<_, String>(6)?)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?)?,
    })
}

impl<'a> ReceiptStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Write a receipt. Only the allocation committer calls this.
    #[instrument(skip(self, receipt), fields(reference = %receipt.payment_reference))]
    pub fn create(&self, receipt: &Receipt) -> Result<()> {
        self.conn.execute(
            "INSERT INTO receipts (id, matric_number, student_name, payment_reference,
                                   amount_paid, verified, date_paid, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                receipt.id.to_string(),
                receipt.matric_number,
                receipt.student_name,
                receipt.payment_reference,
                receipt.amount_paid,
                receipt.verified as i32,
                receipt.date_paid.to_rfc3339(),
                receipt.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find receipt by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Receipt>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM receipts WHERE id = ?1",
            RECEIPT_COLUMNS
        ))?;

        let receipt = stmt
            .query_row(params![id.to_string()], receipt_from_row)
            .optional()?;

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Student};
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let student = Student::new(
            "CSC/2020/001".into(),
            "Ada Obi".into(),
            "ada@example.edu".into(),
            Gender::Female,
        );
        db.students().create(&student).unwrap();

        let receipt = Receipt::new(&student, Receipt::generate_reference(), 85_000_00);
        db.receipts().create(&receipt).unwrap();

        let found = db.receipts().find_by_id(receipt.id).unwrap().unwrap();
        assert_eq!(found.matric_number, "CSC/2020/001");
        assert_eq!(found.student_name, "Ada Obi");
        assert_eq!(found.payment_reference, receipt.payment_reference);
        assert_eq!(found.amount_paid, 85_000_00);
        assert!(found.verified);

        assert!(db.receipts().find_by_id(Uuid::new_v4()).unwrap().is_none());
    }
}
