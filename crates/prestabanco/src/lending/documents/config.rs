use serde::{Deserialize, Serialize};

use super::transitions::TransitionPolicy;

/// Business rules applied by the lifecycle manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    pub transitions: TransitionPolicy,
    /// Refuse a new document while a non-rejected one of the same type exists.
    pub single_active_per_type: bool,
}
