//! Configuration persistence and lookup traits

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::config::AiConfiguration;
use crate::domain::DomainError;

/// Durable store holding the single AI configuration record
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConfigurationStore: Send + Sync + std::fmt::Debug {
    /// Most recently saved configuration, `None` before first save
    async fn get_latest(&self) -> Result<Option<AiConfiguration>, DomainError>;

    /// Inserts the record, fails with a conflict if one already exists
    async fn create(&self, config: AiConfiguration) -> Result<AiConfiguration, DomainError>;

    /// Replaces the record, fails with not-found if none exists yet
    async fn update(&self, config: AiConfiguration) -> Result<AiConfiguration, DomainError>;
}

/// Anything able to hand out the configuration in force for the current turn
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn active_config(&self) -> Result<AiConfiguration, DomainError>;
}

/// Fixed configuration, for tests and deployments without an admin store
#[derive(Debug, Clone)]
pub struct StaticConfigSource {
    config: AiConfiguration,
}

impl StaticConfigSource {
    pub fn new(config: AiConfiguration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn active_config(&self) -> Result<AiConfiguration, DomainError> {
        Ok(self.config.clone())
    }
}
