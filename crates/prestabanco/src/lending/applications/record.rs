use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lending::domain::{ApplicationId, ApplicationStatus, LoanCategory, UserId};

/// One loan application. `details` carries the loan figures untouched; pricing
/// and eligibility are handled by other systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub category: LoanCategory,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Borrower input for opening an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub user_id: UserId,
    pub category: LoanCategory,
    #[serde(default)]
    pub details: Value,
}

/// Application awaiting its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub user_id: UserId,
    pub category: LoanCategory,
    pub status: ApplicationStatus,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

/// Editable application fields. Status changes go through `update_status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(default)]
    pub category: Option<LoanCategory>,
    #[serde(default)]
    pub details: Option<Value>,
}
