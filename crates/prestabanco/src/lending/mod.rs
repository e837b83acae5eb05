//! Loan application intake, supporting documents and completeness review.

pub mod applications;
pub mod completeness;
pub mod documents;
pub mod domain;
pub mod store;

#[cfg(test)]
mod tests;

pub use applications::{
    ApplicationDraft, ApplicationPatch, ApplicationRecord, ApplicationService,
    ApplicationServiceError,
};
pub use completeness::{CompletenessEvaluator, CompletenessReport, DocumentRequirements};
pub use documents::{
    DocumentError, DocumentLifecycleManager, DocumentPatch, DocumentRecord, LifecycleConfig,
    TransitionPolicy,
};
pub use domain::{
    ApplicationId, ApplicationStatus, DocumentId, DocumentStatus, DocumentType, LoanCategory,
    ParseStatusError, UserId,
};
pub use store::{ApplicationStore, CascadeSummary, DocumentStore, MemoryStore, StoreError};
