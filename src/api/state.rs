//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::assistant::{ConfigProvider, FormDataExtractor, Orchestrator};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub config_provider: Arc<ConfigProvider>,
    pub orchestrator: Arc<Orchestrator>,
    pub extractor: Arc<FormDataExtractor>,
}

impl AppState {
    pub fn new(
        config_provider: Arc<ConfigProvider>,
        orchestrator: Arc<Orchestrator>,
        extractor: Arc<FormDataExtractor>,
    ) -> Self {
        Self {
            config_provider,
            orchestrator,
            extractor,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::domain::assistant::{test_configuration, MockFallbackDialogue, MockPrimaryDialogue};
    use crate::domain::AiConfiguration;
    use crate::infrastructure::assistant::StorageConfigurationStore;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::storage::InMemoryStorage;
    use std::time::Duration;

    /// State over in-memory storage and the given dialogue doubles
    pub fn state_with(primary: MockPrimaryDialogue, fallback: MockFallbackDialogue) -> AppState {
        let fallback = Arc::new(fallback);
        let cache = Arc::new(InMemoryCache::new());
        let store = StorageConfigurationStore::new(Arc::new(InMemoryStorage::<AiConfiguration>::new()));
        let config_provider = Arc::new(ConfigProvider::new(
            Arc::new(store),
            cache.clone(),
            test_configuration(),
        ));

        let orchestrator = Orchestrator::new(
            config_provider.clone(),
            Arc::new(primary),
            fallback.clone(),
            cache,
        )
        .with_retry_backoff(Duration::ZERO);
        let extractor = FormDataExtractor::new(config_provider.clone(), fallback);

        AppState::new(config_provider, Arc::new(orchestrator), Arc::new(extractor))
    }
}
