//! Decides whether an application has every required document approved.

mod config;

pub use config::{DocumentRequirements, RequirementsError};

use serde::{Deserialize, Serialize};

use super::applications::ApplicationRecord;
use super::documents::DocumentRecord;
use super::domain::{ApplicationId, DocumentStatus, DocumentType, LoanCategory};

/// Stateless evaluator applying the requirement table to an application's documents.
#[derive(Debug, Clone, Default)]
pub struct CompletenessEvaluator {
    requirements: DocumentRequirements,
}

impl CompletenessEvaluator {
    pub fn new(requirements: DocumentRequirements) -> Self {
        Self { requirements }
    }

    pub fn evaluate(
        &self,
        application: &ApplicationRecord,
        documents: &[DocumentRecord],
    ) -> CompletenessReport {
        let missing_types: Vec<DocumentType> = self
            .requirements
            .required_for(application.category)
            .filter(|required| {
                !documents.iter().any(|document| {
                    document.application_id == application.id
                        && document.document_type == *required
                        && document.status == DocumentStatus::Approved
                })
            })
            .collect();

        CompletenessReport {
            application_id: application.id,
            category: application.category,
            complete: missing_types.is_empty(),
            missing_types,
        }
    }
}

/// Outcome of a completeness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub application_id: ApplicationId,
    pub category: LoanCategory,
    pub complete: bool,
    pub missing_types: Vec<DocumentType>,
}
