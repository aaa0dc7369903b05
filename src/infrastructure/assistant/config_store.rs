//! Storage-backed AI configuration store

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    AiConfiguration, AiConfigurationId, ConfigurationStore, DomainError, Storage,
};

/// Keeps the single configuration record in any [`Storage`] backend
#[derive(Debug)]
pub struct StorageConfigurationStore {
    storage: Arc<dyn Storage<AiConfiguration>>,
}

impl StorageConfigurationStore {
    pub fn new(storage: Arc<dyn Storage<AiConfiguration>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ConfigurationStore for StorageConfigurationStore {
    async fn get_latest(&self) -> Result<Option<AiConfiguration>, DomainError> {
        self.storage.get(&AiConfigurationId::singleton()).await
    }

    async fn create(&self, config: AiConfiguration) -> Result<AiConfiguration, DomainError> {
        let config = config.validated()?;
        self.storage.create(config).await
    }

    async fn update(&self, config: AiConfiguration) -> Result<AiConfiguration, DomainError> {
        let mut config = config.validated()?;
        config.touch();
        self.storage.update(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assistant::test_configuration;
    use crate::domain::storage::MockStorage;
    use crate::infrastructure::storage::InMemoryStorage;

    fn store() -> StorageConfigurationStore {
        StorageConfigurationStore::new(Arc::new(InMemoryStorage::<AiConfiguration>::new()))
    }

    #[tokio::test]
    async fn test_empty_store_has_no_record() {
        assert!(store().get_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_get_latest() {
        let store = store();
        store.create(test_configuration()).await.unwrap();

        let latest = store.get_latest().await.unwrap().unwrap();
        assert_eq!(latest.primary.model, "regional-chat");
    }

    #[tokio::test]
    async fn test_second_create_conflicts() {
        let store = store();
        store.create(test_configuration()).await.unwrap();

        let result = store.create(test_configuration()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let store = store();
        let created = store.create(test_configuration()).await.unwrap();

        let updated = store
            .update(created.clone().with_confidence_threshold(0.55))
            .await
            .unwrap();

        assert_eq!(updated.confidence_threshold, 0.55);
        assert!(updated.updated_at() >= created.updated_at());
    }

    #[tokio::test]
    async fn test_update_without_record_is_not_found() {
        let result = store().update(test_configuration()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_record_is_rejected_before_storage() {
        let store = store();
        let result = store
            .create(test_configuration().with_confidence_threshold(-0.1))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(store.get_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let store = StorageConfigurationStore::new(Arc::new(
            MockStorage::<AiConfiguration>::new().with_error("connection refused"),
        ));

        let result = store.get_latest().await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
