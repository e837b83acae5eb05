use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::record::{ApplicationDraft, ApplicationPatch, ApplicationRecord, NewApplication};
use crate::lending::completeness::{CompletenessEvaluator, CompletenessReport};
use crate::lending::domain::{
    ApplicationId, ApplicationStatus, DocumentType, ParseStatusError, UserId,
};
use crate::lending::store::{ApplicationStore, CascadeSummary, DocumentStore, StoreError};

/// Service composing the application store, document store and completeness evaluator.
pub struct ApplicationService<A, D> {
    applications: Arc<A>,
    documents: Arc<D>,
    evaluator: Arc<CompletenessEvaluator>,
}

impl<A, D> ApplicationService<A, D>
where
    A: ApplicationStore + 'static,
    D: DocumentStore + 'static,
{
    pub fn new(applications: Arc<A>, documents: Arc<D>, evaluator: CompletenessEvaluator) -> Self {
        Self {
            applications,
            documents,
            evaluator: Arc::new(evaluator),
        }
    }

    /// Open a new application in `IN_REVIEW`.
    pub fn create(
        &self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.applications.insert(NewApplication {
            user_id: draft.user_id,
            category: draft.category,
            status: ApplicationStatus::InReview,
            details: draft.details,
            created_at: Utc::now(),
        })?;

        info!(
            application_id = %record.id,
            user_id = %record.user_id,
            category = record.category.label(),
            "application opened"
        );
        Ok(record)
    }

    pub fn get(&self, id: ApplicationId) -> Result<ApplicationRecord, ApplicationServiceError> {
        self.applications
            .fetch(id)?
            .ok_or(ApplicationServiceError::NotFound(id))
    }

    pub fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.applications.by_user(user_id)?)
    }

    pub fn list_all(&self) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.applications.all()?)
    }

    /// Edit the category or loan details. Owner and status are kept from the store.
    pub fn update(
        &self,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self.get(id)?;
        let previous_category = record.category;
        if let Some(category) = patch.category {
            record.category = category;
        }
        if let Some(details) = patch.details {
            record.details = details;
        }

        // An approved application must stay complete under its new category.
        if record.category != previous_category && record.status.requires_complete_documents() {
            let report = self.evaluate_record(&record)?;
            if !report.complete {
                warn!(
                    application_id = %id,
                    category = record.category.label(),
                    missing = ?report.missing_types,
                    "category change blocked by missing documents"
                );
                return Err(ApplicationServiceError::IncompleteDocumentation {
                    id,
                    missing: report.missing_types,
                });
            }
        }

        let stored = self.applications.update(record).map_err(|err| match err {
            StoreError::NotFound => ApplicationServiceError::NotFound(id),
            other => ApplicationServiceError::Store(other),
        })?;
        Ok(stored)
    }

    /// Move the application to the status named by `raw_status`. Approval statuses are
    /// refused until every required document type has an approved document.
    pub fn update_status(
        &self,
        id: ApplicationId,
        raw_status: &str,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let status: ApplicationStatus = raw_status.parse()?;
        let mut record = self.get(id)?;

        if status.requires_complete_documents() {
            let report = self.evaluate_record(&record)?;
            if !report.complete {
                warn!(
                    application_id = %id,
                    status = status.label(),
                    missing = ?report.missing_types,
                    "approval blocked by missing documents"
                );
                return Err(ApplicationServiceError::IncompleteDocumentation {
                    id,
                    missing: report.missing_types,
                });
            }
        }

        let previous = record.status;
        record.status = status;
        let stored = self.applications.update(record).map_err(|err| match err {
            StoreError::NotFound => ApplicationServiceError::NotFound(id),
            other => ApplicationServiceError::Store(other),
        })?;

        info!(
            application_id = %id,
            from = previous.label(),
            to = stored.status.label(),
            "application status changed"
        );
        Ok(stored)
    }

    pub fn evaluate_completeness(
        &self,
        id: ApplicationId,
    ) -> Result<CompletenessReport, ApplicationServiceError> {
        let record = self.get(id)?;
        self.evaluate_record(&record)
    }

    /// Delete the application together with its documents. Unknown ids are a no-op.
    pub fn delete(&self, id: ApplicationId) -> Result<CascadeSummary, ApplicationServiceError> {
        let summary = self.applications.delete(id)?;
        info!(
            application_id = %id,
            removed = summary.application_removed,
            documents = summary.documents_removed.len(),
            "application deleted"
        );
        Ok(summary)
    }

    fn evaluate_record(
        &self,
        record: &ApplicationRecord,
    ) -> Result<CompletenessReport, ApplicationServiceError> {
        let documents = self.documents.by_application(record.id)?;
        Ok(self.evaluator.evaluate(record, &documents))
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),
    #[error("application {id} is missing approved documents: {}", missing_labels(.missing))]
    IncompleteDocumentation {
        id: ApplicationId,
        missing: Vec<DocumentType>,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn missing_labels(missing: &[DocumentType]) -> String {
    missing
        .iter()
        .map(|document_type| document_type.label())
        .collect::<Vec<_>>()
        .join(", ")
}
