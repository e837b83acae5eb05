use serde::{Deserialize, Serialize};

use crate::lending::domain::DocumentStatus;

/// How strictly reviewer status changes are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Only `PENDING -> APPROVED` and `PENDING -> REJECTED`, plus re-applying the current status.
    #[default]
    Strict,
    /// Any status may follow any other.
    Permissive,
}

impl TransitionPolicy {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "permissive" => Some(Self::Permissive),
            _ => None,
        }
    }

    pub fn allows(self, from: DocumentStatus, to: DocumentStatus) -> bool {
        if from == to {
            return true;
        }

        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => matches!(
                (from, to),
                (DocumentStatus::Pending, DocumentStatus::Approved)
                    | (DocumentStatus::Pending, DocumentStatus::Rejected)
            ),
        }
    }
}
