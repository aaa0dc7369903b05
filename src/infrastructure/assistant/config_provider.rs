//! Cached access to the active AI configuration

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::assistant::policy::CONFIG_CACHE_TTL;
use crate::domain::{
    AiConfiguration, Cache, CacheExt, ConfigSource, ConfigurationStore, DomainError,
};

/// Cache key of the active configuration
pub const CONFIG_CACHE_KEY: &str = "ai_config:active";

/// Serves the active configuration through a short-lived cache in front of the store.
///
/// When nothing was saved yet the environment-derived defaults are served.
#[derive(Debug)]
pub struct ConfigProvider {
    store: Arc<dyn ConfigurationStore>,
    cache: Arc<dyn Cache>,
    defaults: AiConfiguration,
}

impl ConfigProvider {
    pub fn new(
        store: Arc<dyn ConfigurationStore>,
        cache: Arc<dyn Cache>,
        defaults: AiConfiguration,
    ) -> Self {
        Self {
            store,
            cache,
            defaults,
        }
    }

    /// Configuration in force right now
    pub async fn get_active_config(&self) -> Result<AiConfiguration, DomainError> {
        match self.cache.get::<AiConfiguration>(CONFIG_CACHE_KEY).await {
            Ok(Some(config)) => {
                debug!("AI configuration served from cache");
                return Ok(config);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Configuration cache read failed, loading from store"),
        }

        let config = match self.store.get_latest().await? {
            Some(config) => config,
            None => {
                debug!("No stored AI configuration, serving defaults");
                self.defaults.clone()
            }
        };

        if let Err(e) = self
            .cache
            .set(CONFIG_CACHE_KEY, &config, CONFIG_CACHE_TTL)
            .await
        {
            warn!(error = %e, "Failed to cache AI configuration");
        }

        Ok(config)
    }

    /// Validates and persists a new configuration, then drops the cached copy.
    ///
    /// Empty or masked API keys keep the value currently in force.
    pub async fn update_config(
        &self,
        config: AiConfiguration,
    ) -> Result<AiConfiguration, DomainError> {
        let current = self.store.get_latest().await?;
        let base = current.as_ref().unwrap_or(&self.defaults);
        let config = config.with_secrets_from(base).validated()?;

        let saved = match current {
            Some(_) => self.store.update(config).await?,
            None => self.store.create(config).await?,
        };

        self.invalidate().await;
        info!(
            threshold = saved.confidence_threshold,
            strategy = %saved.fallback_strategy,
            max_retries = saved.max_retries,
            cache_enabled = saved.cache_enabled,
            "AI configuration updated"
        );

        Ok(saved)
    }

    /// Seeds the store with the defaults unless a record already exists
    pub async fn initialize(&self) -> Result<AiConfiguration, DomainError> {
        if let Some(existing) = self.store.get_latest().await? {
            debug!("AI configuration already initialized");
            return Ok(existing);
        }

        let created = match self.store.create(self.defaults.clone()).await {
            Ok(created) => created,
            Err(DomainError::Conflict { .. }) => {
                // Another replica seeded it first
                self.store.get_latest().await?.ok_or_else(|| {
                    DomainError::internal("AI configuration vanished after conflicting create")
                })?
            }
            Err(e) => return Err(e),
        };

        self.invalidate().await;
        info!("AI configuration initialized with defaults");

        Ok(created)
    }

    async fn invalidate(&self) {
        if let Err(e) = self.cache.delete(CONFIG_CACHE_KEY).await {
            warn!(error = %e, "Failed to invalidate cached AI configuration");
        }
    }
}

#[async_trait]
impl ConfigSource for ConfigProvider {
    async fn active_config(&self) -> Result<AiConfiguration, DomainError> {
        self.get_active_config().await
    }
}
