//! Student model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hall/student gender constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Whether a student's hostel fee has been confirmed by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Verified,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Verified => "Verified",
            PaymentStatus::Pending => "Pending",
        }
    }
}

/// A student eligible to book a hall room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    /// Matriculation number, unique across the system
    pub matric_number: String,
    pub full_name: String,
    pub email: String,
    pub department: Option<String>,
    pub level: Option<String>,
    pub gender: Gender,
    pub payment_status: PaymentStatus,
    /// Hall the student has been placed in. Set only together with `room_id`
    /// and always equal to the room's hall.
    pub hall_selected: Option<Uuid>,
    /// Room the student occupies, if any
    pub room_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(matric_number: String, full_name: String, email: String, gender: Gender) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            matric_number,
            full_name,
            email,
            department: None,
            level: None,
            gender,
            payment_status: PaymentStatus::Pending,
            hall_selected: None,
            room_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_department(mut self, department: String) -> Self {
        self.department = Some(department);
        self
    }

    pub fn with_level(mut self, level: String) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_payment_verified(mut self) -> Self {
        self.payment_status = PaymentStatus::Verified;
        self
    }

    pub fn has_room(&self) -> bool {
        self.room_id.is_some()
    }
}
