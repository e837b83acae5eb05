use metrics_exporter_prometheus::PrometheusHandle;
use prestabanco::config::LendingConfig;
use prestabanco::lending::{
    ApplicationService, CompletenessEvaluator, DocumentLifecycleManager, MemoryStore,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Documents = DocumentLifecycleManager<MemoryStore, MemoryStore>;
pub(crate) type Applications = ApplicationService<MemoryStore, MemoryStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lending services wired against one shared in-memory store, so the application
/// cascade and the document foreign-key check see the same transaction boundary.
pub(crate) struct LendingServices {
    pub(crate) documents: Arc<Documents>,
    pub(crate) applications: Arc<Applications>,
}

impl LendingServices {
    pub(crate) fn in_memory(config: &LendingConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let documents = Arc::new(DocumentLifecycleManager::new(
            store.clone(),
            store.clone(),
            config.lifecycle,
        ));
        let applications = Arc::new(ApplicationService::new(
            store.clone(),
            store,
            CompletenessEvaluator::new(config.requirements.clone()),
        ));

        Self {
            documents,
            applications,
        }
    }
}
