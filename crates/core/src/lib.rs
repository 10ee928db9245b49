//! HAMS core - hall allocation management
//!
//! The transactional engine behind student room booking: eligibility
//! checks, deterministic room selection, atomic allocation commits, receipt
//! generation, maintenance toggling, and availability reconciliation, all
//! on a SQLite store.

pub mod booking;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod notify;
pub mod reports;
pub mod storage;

pub use booking::{
    BookingConfirmation, BookingEngine, BookingRequest, HallDrift, MaintenanceChange,
    ReconciliationReport,
};
pub use config::HamsConfig;
pub use error::{Error, Result};
pub use notify::{AllocationNotice, ChannelNotifier, Notifier, TracingNotifier};
pub use storage::Database;
