use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::config::LifecycleConfig;
use super::record::{DocumentPatch, DocumentRecord, NewDocument};
use crate::lending::domain::{
    ApplicationId, DocumentId, DocumentStatus, DocumentType, ParseStatusError,
};
use crate::lending::store::{ApplicationStore, DocumentStore, StoreError};

/// Enforces document status transitions and the link to an owning application.
///
/// The manager holds no mutable state; every call is a read-validate-write against
/// the stores, and the stores are responsible for making the write atomic.
pub struct DocumentLifecycleManager<D, A> {
    documents: Arc<D>,
    applications: Arc<A>,
    config: LifecycleConfig,
}

impl<D, A> DocumentLifecycleManager<D, A>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    pub fn new(documents: Arc<D>, applications: Arc<A>, config: LifecycleConfig) -> Self {
        Self {
            documents,
            applications,
            config,
        }
    }

    /// Register a freshly uploaded document in `PENDING` status.
    pub fn create(
        &self,
        application_id: ApplicationId,
        document_type: DocumentType,
        file_name: impl Into<String>,
        file_url: impl Into<String>,
    ) -> Result<DocumentRecord, DocumentError> {
        let file_name = required_field("file_name", file_name.into())?;
        let file_url = required_field("file_url", file_url.into())?;

        if self.applications.fetch(application_id)?.is_none() {
            return Err(DocumentError::UnknownApplication(application_id));
        }

        if self.config.single_active_per_type {
            self.ensure_single_active(application_id, document_type, None)?;
        }

        let record = self
            .documents
            .insert(NewDocument {
                application_id,
                document_type,
                file_name,
                file_url,
                upload_date: Utc::now(),
                status: DocumentStatus::Pending,
            })
            .map_err(|err| match err {
                // Application removed between the lookup and the insert.
                StoreError::MissingApplication(id) => DocumentError::UnknownApplication(id),
                other => DocumentError::Store(other),
            })?;

        info!(
            document_id = %record.id,
            application_id = %record.application_id,
            document_type = record.document_type.label(),
            "document registered"
        );
        Ok(record)
    }

    pub fn get(&self, id: DocumentId) -> Result<DocumentRecord, DocumentError> {
        self.documents
            .fetch(id)?
            .ok_or(DocumentError::NotFound(id))
    }

    /// Documents attached to the application in upload order. Unknown applications
    /// simply have no documents.
    pub fn list_for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<DocumentRecord>, DocumentError> {
        Ok(self.documents.by_application(application_id)?)
    }

    /// Apply a patch to the stored document. The stored id, owning application, type
    /// and upload date are never taken from the caller.
    pub fn update(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
    ) -> Result<DocumentRecord, DocumentError> {
        let mut record = self.get(id)?;

        if let Some(expected) = patch.expected_version {
            if expected != record.version {
                return Err(DocumentError::VersionConflict {
                    id,
                    expected,
                    actual: record.version,
                });
            }
        }

        if let Some(file_name) = patch.file_name {
            record.file_name = required_field("file_name", file_name)?;
        }
        if let Some(file_url) = patch.file_url {
            record.file_url = required_field("file_url", file_url)?;
        }

        let previous = record.status;
        if let Some(status) = patch.status {
            if !self.config.transitions.allows(previous, status) {
                warn!(
                    document_id = %id,
                    from = previous.label(),
                    to = status.label(),
                    "rejected document status transition"
                );
                return Err(DocumentError::InvalidTransition {
                    id,
                    from: previous,
                    to: status,
                });
            }
            let reactivates = !previous.is_active() && status.is_active();
            if self.config.single_active_per_type && reactivates {
                self.ensure_single_active(
                    record.application_id,
                    record.document_type,
                    Some(id),
                )?;
            }
            record.status = status;
        }

        let stored = self.documents.update(record).map_err(|err| match err {
            StoreError::NotFound => DocumentError::NotFound(id),
            StoreError::StaleVersion { expected, actual } => DocumentError::VersionConflict {
                id,
                expected,
                actual,
            },
            other => DocumentError::Store(other),
        })?;

        if stored.status != previous {
            info!(
                document_id = %stored.id,
                application_id = %stored.application_id,
                from = previous.label(),
                to = stored.status.label(),
                "document reviewed"
            );
        } else {
            debug!(document_id = %stored.id, version = stored.version, "document updated");
        }
        Ok(stored)
    }

    /// Reviewer shortcut taking the status as submitted by the caller.
    pub fn set_status(
        &self,
        id: DocumentId,
        raw_status: &str,
    ) -> Result<DocumentRecord, DocumentError> {
        let status: DocumentStatus = raw_status.parse()?;
        self.update(id, DocumentPatch::status(status))
    }

    /// Remove a document. Deleting an unknown id succeeds and reports `false`.
    pub fn delete(&self, id: DocumentId) -> Result<bool, DocumentError> {
        let removed = self.documents.delete(id)?;
        if removed {
            info!(document_id = %id, "document deleted");
        } else {
            debug!(document_id = %id, "delete ignored for unknown document");
        }
        Ok(removed)
    }
}

impl<D, A> DocumentLifecycleManager<D, A>
where
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
{
    /// Fails when another document of the same type is already pending or approved.
    fn ensure_single_active(
        &self,
        application_id: ApplicationId,
        document_type: DocumentType,
        excluding: Option<DocumentId>,
    ) -> Result<(), DocumentError> {
        let active = self
            .documents
            .by_application(application_id)?
            .into_iter()
            .find(|record| {
                Some(record.id) != excluding
                    && record.document_type == document_type
                    && record.status.is_active()
            });
        match active {
            Some(existing) => Err(DocumentError::DuplicateActive {
                application_id,
                document_type,
                existing: existing.id,
            }),
            None => Ok(()),
        }
    }
}

fn required_field(field: &'static str, value: String) -> Result<String, DocumentError> {
    if value.trim().is_empty() {
        Err(DocumentError::EmptyField(field))
    } else {
        Ok(value)
    }
}

/// Error raised by the document lifecycle manager.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document {0} not found")]
    NotFound(DocumentId),
    #[error("application {0} does not exist")]
    UnknownApplication(ApplicationId),
    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),
    #[error("document {id} cannot move from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        id: DocumentId,
        from: DocumentStatus,
        to: DocumentStatus,
    },
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error(
        "application {application_id} already has an active {} document ({existing})",
        .document_type.label()
    )]
    DuplicateActive {
        application_id: ApplicationId,
        document_type: DocumentType,
        existing: DocumentId,
    },
    #[error("document {id} changed concurrently: expected version {expected}, found {actual}")]
    VersionConflict {
        id: DocumentId,
        expected: u64,
        actual: u64,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
