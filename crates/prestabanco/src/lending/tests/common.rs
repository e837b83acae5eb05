use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::lending::applications::{ApplicationRecord, ApplicationService, NewApplication};
use crate::lending::completeness::{CompletenessEvaluator, DocumentRequirements};
use crate::lending::documents::{
    DocumentLifecycleManager, DocumentRecord, LifecycleConfig, NewDocument,
};
use crate::lending::domain::{
    ApplicationId, ApplicationStatus, DocumentId, DocumentType, LoanCategory, UserId,
};
use crate::lending::store::{
    ApplicationStore, CascadeSummary, DocumentStore, MemoryStore, StoreError,
};

pub(super) type MemoryLifecycle = DocumentLifecycleManager<MemoryStore, MemoryStore>;
pub(super) type MemoryApplications = ApplicationService<MemoryStore, MemoryStore>;

pub(super) fn borrower() -> UserId {
    UserId(42)
}

pub(super) fn lifecycle_with(config: LifecycleConfig) -> (MemoryLifecycle, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let manager = DocumentLifecycleManager::new(store.clone(), store.clone(), config);
    (manager, store)
}

pub(super) fn lifecycle() -> (MemoryLifecycle, Arc<MemoryStore>) {
    lifecycle_with(LifecycleConfig::default())
}

/// Requirement table used by the scenarios: first-home loans need only the deed.
pub(super) fn requirements() -> DocumentRequirements {
    DocumentRequirements::empty()
        .with_requirement(LoanCategory::FirstHome, [DocumentType::FirstHomeDeed])
        .with_requirement(
            LoanCategory::Commercial,
            [
                DocumentType::BusinessFinancialStatement,
                DocumentType::BusinessPlan,
            ],
        )
}

pub(super) fn services() -> (MemoryApplications, MemoryLifecycle, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let applications = ApplicationService::new(
        store.clone(),
        store.clone(),
        CompletenessEvaluator::new(requirements()),
    );
    let documents =
        DocumentLifecycleManager::new(store.clone(), store.clone(), LifecycleConfig::default());
    (applications, documents, store)
}

pub(super) fn open_application(store: &MemoryStore, category: LoanCategory) -> ApplicationRecord {
    ApplicationStore::insert(
        store,
        NewApplication {
            user_id: borrower(),
            category,
            status: ApplicationStatus::InReview,
            details: json!({ "requested_amount": 95_000_000, "term_years": 20 }),
            created_at: Utc::now(),
        },
    )
    .expect("application stored")
}

pub(super) fn upload(
    manager: &MemoryLifecycle,
    application_id: ApplicationId,
    document_type: DocumentType,
) -> DocumentRecord {
    let file_name = format!("{}.pdf", document_type.label().to_ascii_lowercase());
    let file_url = format!("https://storage.example.com/docs/{application_id}/{file_name}");
    manager
        .create(application_id, document_type, file_name, file_url)
        .expect("document created")
}

/// Store stub whose backend is offline.
pub(super) struct UnavailableStore;

fn offline() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

impl DocumentStore for UnavailableStore {
    fn insert(&self, _document: NewDocument) -> Result<DocumentRecord, StoreError> {
        Err(offline())
    }

    fn update(&self, _record: DocumentRecord) -> Result<DocumentRecord, StoreError> {
        Err(offline())
    }

    fn fetch(&self, _id: DocumentId) -> Result<Option<DocumentRecord>, StoreError> {
        Err(offline())
    }

    fn by_application(
        &self,
        _application_id: ApplicationId,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        Err(offline())
    }

    fn delete(&self, _id: DocumentId) -> Result<bool, StoreError> {
        Err(offline())
    }
}

impl ApplicationStore for UnavailableStore {
    fn insert(&self, _application: NewApplication) -> Result<ApplicationRecord, StoreError> {
        Err(offline())
    }

    fn update(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        Err(offline())
    }

    fn fetch(&self, _id: ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Err(offline())
    }

    fn by_user(&self, _user_id: UserId) -> Result<Vec<ApplicationRecord>, StoreError> {
        Err(offline())
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        Err(offline())
    }

    fn delete(&self, _id: ApplicationId) -> Result<CascadeSummary, StoreError> {
        Err(offline())
    }
}
