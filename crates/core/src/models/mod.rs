//! Data models for HAMS

mod allocation;
mod audit;
mod hall;
mod payment;
mod receipt;
mod room;
mod student;

pub use allocation::*;
pub use audit::*;
pub use hall::*;
pub use payment::*;
pub use receipt::*;
pub use room::*;
pub use student::*;
