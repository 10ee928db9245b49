//! Receipt model - proof-of-payment generated at allocation time

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Student;

/// Prefix for generated allocation receipt references
pub const RECEIPT_REFERENCE_PREFIX: &str = "BU-HAMS-";

/// Length of the random suffix on a receipt reference
const REFERENCE_SUFFIX_LEN: usize = 8;

/// An immutable receipt created by the allocation committer. Never updated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub matric_number: String,
    pub student_name: String,
    /// Generated transaction reference (`BU-HAMS-` + 8 alphanumerics)
    pub payment_reference: String,
    pub amount_paid: i64,
    pub verified: bool,
    pub date_paid: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(student: &Student, payment_reference: String, amount_paid: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            matric_number: student.matric_number.clone(),
            student_name: student.full_name.clone(),
            payment_reference,
            amount_paid,
            verified: true,
            date_paid: now,
            created_at: now,
        }
    }

    /// Generate an opaque transaction reference. Uppercase so the reference
    /// survives case-insensitive handling downstream; collision probability
    /// is negligible at 36^8.
    pub fn generate_reference() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(REFERENCE_SUFFIX_LEN)
            .map(|c| (c as char).to_ascii_uppercase())
            .collect();

        format!("{}{}", RECEIPT_REFERENCE_PREFIX, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let reference = Receipt::generate_reference();
        assert!(reference.starts_with(RECEIPT_REFERENCE_PREFIX));

        let suffix = &reference[RECEIPT_REFERENCE_PREFIX.len()..];
        assert_eq!(suffix.len(), REFERENCE_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_references_distinct() {
        let a = Receipt::generate_reference();
        let b = Receipt::generate_reference();
        assert_ne!(a, b);
    }
}
