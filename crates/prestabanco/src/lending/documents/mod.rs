//! Supporting document records and the reviewer-driven status lifecycle.

mod config;
mod lifecycle;
mod record;
mod transitions;

pub use config::LifecycleConfig;
pub use lifecycle::{DocumentError, DocumentLifecycleManager};
pub use record::{DocumentPatch, DocumentRecord, NewDocument};
pub use transitions::TransitionPolicy;
