//! Storage contracts consumed by the lifecycle manager and application service.
//!
//! Implementations must give each call transactional semantics: a cascade delete or a
//! version-checked update is either fully visible or not at all.

mod memory;

pub use memory::MemoryStore;

use serde::Serialize;

use super::applications::{ApplicationRecord, NewApplication};
use super::documents::{DocumentRecord, NewDocument};
use super::domain::{ApplicationId, DocumentId, UserId};

/// Durable keyed storage for document metadata.
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document. Fails with `MissingApplication` when the owning
    /// application does not exist at commit time.
    fn insert(&self, document: NewDocument) -> Result<DocumentRecord, StoreError>;
    /// Replaces a stored document if `record.version` still matches, bumping the version.
    fn update(&self, record: DocumentRecord) -> Result<DocumentRecord, StoreError>;
    fn fetch(&self, id: DocumentId) -> Result<Option<DocumentRecord>, StoreError>;
    /// Documents owned by the application, in insertion order.
    fn by_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<DocumentRecord>, StoreError>;
    /// Removes a document. Returns `false` when nothing was stored under `id`.
    fn delete(&self, id: DocumentId) -> Result<bool, StoreError>;
}

/// Durable keyed storage for applications, owning the document cascade.
pub trait ApplicationStore: Send + Sync {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, StoreError>;
    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, StoreError>;
    fn by_user(&self, user_id: UserId) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn all(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
    /// Removes the application and every document it owns in one transaction.
    fn delete(&self, id: ApplicationId) -> Result<CascadeSummary, StoreError>;
}

/// What a cascade delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub application_removed: bool,
    pub documents_removed: Vec<DocumentId>,
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("application {0} does not exist")]
    MissingApplication(ApplicationId),
    #[error("stale write: expected version {expected}, stored version {actual}")]
    StaleVersion { expected: u64, actual: u64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
