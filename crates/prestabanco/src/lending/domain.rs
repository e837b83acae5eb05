use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

/// Store-assigned identifier of a supporting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

/// Identifier of the borrower owning an application. Accounts live elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of supporting document a reviewer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    IncomeProof,
    AppraisalCertificate,
    CreditHistory,
    FirstHomeDeed,
    BusinessFinancialStatement,
    BusinessPlan,
    RemodelingBudget,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        DocumentType::IncomeProof,
        DocumentType::AppraisalCertificate,
        DocumentType::CreditHistory,
        DocumentType::FirstHomeDeed,
        DocumentType::BusinessFinancialStatement,
        DocumentType::BusinessPlan,
        DocumentType::RemodelingBudget,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::IncomeProof => "INCOME_PROOF",
            DocumentType::AppraisalCertificate => "APPRAISAL_CERTIFICATE",
            DocumentType::CreditHistory => "CREDIT_HISTORY",
            DocumentType::FirstHomeDeed => "FIRST_HOME_DEED",
            DocumentType::BusinessFinancialStatement => "BUSINESS_FINANCIAL_STATEMENT",
            DocumentType::BusinessPlan => "BUSINESS_PLAN",
            DocumentType::RemodelingBudget => "REMODELING_BUDGET",
        }
    }
}

/// Review outcome of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [
        DocumentStatus::Pending,
        DocumentStatus::Approved,
        DocumentStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Rejected => "REJECTED",
        }
    }

    /// Rejected documents no longer count towards the application.
    pub const fn is_active(self) -> bool {
        !matches!(self, DocumentStatus::Rejected)
    }
}

/// Loan category, which drives the required document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanCategory {
    FirstHome,
    SecondHome,
    Commercial,
    Remodeling,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 4] = [
        LoanCategory::FirstHome,
        LoanCategory::SecondHome,
        LoanCategory::Commercial,
        LoanCategory::Remodeling,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LoanCategory::FirstHome => "FIRST_HOME",
            LoanCategory::SecondHome => "SECOND_HOME",
            LoanCategory::Commercial => "COMMERCIAL",
            LoanCategory::Remodeling => "REMODELING",
        }
    }
}

/// Overall status of a loan application as seen by reviewers and borrowers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    InReview,
    PendingDocuments,
    InEvaluation,
    PreApproved,
    FinalApproval,
    Approved,
    Rejected,
    Cancelled,
    InDisbursement,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 9] = [
        ApplicationStatus::InReview,
        ApplicationStatus::PendingDocuments,
        ApplicationStatus::InEvaluation,
        ApplicationStatus::PreApproved,
        ApplicationStatus::FinalApproval,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Cancelled,
        ApplicationStatus::InDisbursement,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::InReview => "IN_REVIEW",
            ApplicationStatus::PendingDocuments => "PENDING_DOCUMENTS",
            ApplicationStatus::InEvaluation => "IN_EVALUATION",
            ApplicationStatus::PreApproved => "PRE_APPROVED",
            ApplicationStatus::FinalApproval => "FINAL_APPROVAL",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Cancelled => "CANCELLED",
            ApplicationStatus::InDisbursement => "IN_DISBURSEMENT",
        }
    }

    /// Statuses that may only be entered once every required document is approved.
    pub const fn requires_complete_documents(self) -> bool {
        matches!(
            self,
            ApplicationStatus::FinalApproval
                | ApplicationStatus::Approved
                | ApplicationStatus::InDisbursement
        )
    }
}

/// Raised when a status or type label falls outside its closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}'")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_label<T: Copy>(
    candidates: &[T],
    label: fn(T) -> &'static str,
    kind: &'static str,
    raw: &str,
) -> Result<T, ParseStatusError> {
    let trimmed = raw.trim();
    candidates
        .iter()
        .copied()
        .find(|candidate| label(*candidate) == trimmed)
        .ok_or_else(|| ParseStatusError {
            kind,
            value: raw.to_string(),
        })
}

impl FromStr for DocumentType {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "document type", raw)
    }
}

impl FromStr for DocumentStatus {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "document status", raw)
    }
}

impl FromStr for LoanCategory {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "loan category", raw)
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "application status", raw)
    }
}
