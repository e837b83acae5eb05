//! Loan application document tracking: document lifecycle, application status
//! workflow and completeness review against per-category requirements.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
