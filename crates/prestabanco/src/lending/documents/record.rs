use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lending::domain::{ApplicationId, DocumentId, DocumentStatus, DocumentType};

/// Metadata for one uploaded supporting file. The bytes live in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub application_id: ApplicationId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_url: String,
    pub upload_date: DateTime<Utc>,
    pub status: DocumentStatus,
    /// Bumped by the store on every successful update.
    pub version: u64,
}

/// Document awaiting its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub application_id: ApplicationId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_url: String,
    pub upload_date: DateTime<Utc>,
    pub status: DocumentStatus,
}

/// Caller-supplied changes to an existing document. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    /// When set, the update only applies if the stored version still matches.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl DocumentPatch {
    pub fn status(status: DocumentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
