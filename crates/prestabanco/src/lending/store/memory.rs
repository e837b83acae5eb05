use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::{ApplicationStore, CascadeSummary, DocumentStore, StoreError};
use crate::lending::applications::{ApplicationRecord, NewApplication};
use crate::lending::documents::{DocumentRecord, NewDocument};
use crate::lending::domain::{ApplicationId, DocumentId, UserId};

/// In-process store keeping applications and documents under a single lock, so every
/// call behaves like one serializable transaction.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    applications: BTreeMap<ApplicationId, ApplicationRecord>,
    documents: BTreeMap<DocumentId, DocumentRecord>,
    application_sequence: u64,
    document_sequence: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }

    /// Number of stored documents, across all applications.
    pub fn document_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.documents.len())
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, document: NewDocument) -> Result<DocumentRecord, StoreError> {
        let mut state = self.lock()?;
        if !state.applications.contains_key(&document.application_id) {
            return Err(StoreError::MissingApplication(document.application_id));
        }

        state.document_sequence += 1;
        let record = DocumentRecord {
            id: DocumentId(state.document_sequence),
            application_id: document.application_id,
            document_type: document.document_type,
            file_name: document.file_name,
            file_url: document.file_url,
            upload_date: document.upload_date,
            status: document.status,
            version: 1,
        };
        state.documents.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: DocumentRecord) -> Result<DocumentRecord, StoreError> {
        let mut state = self.lock()?;
        let stored = state
            .documents
            .get_mut(&record.id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != record.version {
            return Err(StoreError::StaleVersion {
                expected: record.version,
                actual: stored.version,
            });
        }

        // Identity and provenance stay with the stored row.
        record.application_id = stored.application_id;
        record.document_type = stored.document_type;
        record.upload_date = stored.upload_date;
        record.version = stored.version + 1;
        *stored = record.clone();
        Ok(record)
    }

    fn fetch(&self, id: DocumentId) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.lock()?.documents.get(&id).cloned())
    }

    fn by_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .documents
            .values()
            .filter(|record| record.application_id == application_id)
            .cloned()
            .collect())
    }

    fn delete(&self, id: DocumentId) -> Result<bool, StoreError> {
        Ok(self.lock()?.documents.remove(&id).is_some())
    }
}

impl ApplicationStore for MemoryStore {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, StoreError> {
        let mut state = self.lock()?;
        state.application_sequence += 1;
        let record = ApplicationRecord {
            id: ApplicationId(state.application_sequence),
            user_id: application.user_id,
            category: application.category,
            status: application.status,
            details: application.details,
            created_at: application.created_at,
            updated_at: application.created_at,
        };
        state.applications.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        let mut state = self.lock()?;
        let stored = state
            .applications
            .get_mut(&record.id)
            .ok_or(StoreError::NotFound)?;
        record.user_id = stored.user_id;
        record.created_at = stored.created_at;
        record.updated_at = Utc::now();
        *stored = record.clone();
        Ok(record)
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(self.lock()?.applications.get(&id).cloned())
    }

    fn by_user(&self, user_id: UserId) -> Result<Vec<ApplicationRecord>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        Ok(self.lock()?.applications.values().cloned().collect())
    }

    fn delete(&self, id: ApplicationId) -> Result<CascadeSummary, StoreError> {
        let mut state = self.lock()?;
        let application_removed = state.applications.remove(&id).is_some();

        let documents_removed: Vec<DocumentId> = state
            .documents
            .values()
            .filter(|record| record.application_id == id)
            .map(|record| record.id)
            .collect();
        for document_id in &documents_removed {
            state.documents.remove(document_id);
        }

        Ok(CascadeSummary {
            application_removed,
            documents_removed,
        })
    }
}
