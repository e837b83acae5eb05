//! Loan applications and the status workflow gated on document completeness.

mod record;
mod service;

pub use record::{ApplicationDraft, ApplicationPatch, ApplicationRecord, NewApplication};
pub use service::{ApplicationService, ApplicationServiceError};
