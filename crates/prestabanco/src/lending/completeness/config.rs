use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::lending::domain::{DocumentType, LoanCategory};

/// Deployment-time table of the document types each loan category must have approved.
///
/// Serialized as a JSON object keyed by category label, e.g.
/// `{"FIRST_HOME": ["FIRST_HOME_DEED"]}`. Categories absent from the table require nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRequirements {
    table: BTreeMap<LoanCategory, BTreeSet<DocumentType>>,
}

impl DocumentRequirements {
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    pub fn with_requirement(
        mut self,
        category: LoanCategory,
        types: impl IntoIterator<Item = DocumentType>,
    ) -> Self {
        self.table.entry(category).or_default().extend(types);
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RequirementsError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RequirementsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| RequirementsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Required types for the category, in `DocumentType` declaration order.
    pub fn required_for(
        &self,
        category: LoanCategory,
    ) -> impl Iterator<Item = DocumentType> + '_ {
        self.table
            .get(&category)
            .into_iter()
            .flat_map(|types| types.iter().copied())
    }
}

impl Default for DocumentRequirements {
    fn default() -> Self {
        Self::empty()
            .with_requirement(LoanCategory::FirstHome, [DocumentType::FirstHomeDeed])
            .with_requirement(LoanCategory::SecondHome, [DocumentType::FirstHomeDeed])
            .with_requirement(
                LoanCategory::Commercial,
                [
                    DocumentType::BusinessFinancialStatement,
                    DocumentType::BusinessPlan,
                ],
            )
            .with_requirement(LoanCategory::Remodeling, [DocumentType::RemodelingBudget])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequirementsError {
    #[error("unable to read document requirements from {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid document requirements in {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
