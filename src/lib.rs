//! Scheme Assistant
//!
//! AI orchestration core for a conversational form-filling assistant:
//! - Confidence-scored replies from a regional primary model
//! - Escalation to a general-purpose fallback model with bounded retries
//! - Response caching per conversation and message
//! - Structured form-data extraction from conversation history
//! - Centrally managed, cached AI configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::AiConfiguration;
use infrastructure::{
    assistant::{
        ConfigProvider, FallbackDialogueClient, FormDataExtractor, Orchestrator,
        PrimaryDialogueClient, StorageConfigurationStore,
    },
    cache::{CacheConfig, CacheFactory, CacheType},
    llm::LlmProviderFactory,
    storage::{StorageConfig, StorageFactory},
};
use tracing::info;

/// Table holding the AI configuration record
const AI_CONFIGURATION_TABLE: &str = "ai_configuration";

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = StorageConfig::from_backend(
        &config.storage.backend,
        config.storage.database_url.as_deref(),
    )?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    let storage =
        StorageFactory::create::<AiConfiguration>(&storage_config, AI_CONFIGURATION_TABLE).await?;

    let cache_config = cache_config(config)?;
    info!("Cache backend: {}", cache_config.cache_type);
    let cache = CacheFactory::new().create(&cache_config).await?;

    let store = StorageConfigurationStore::new(storage);
    let config_provider = Arc::new(ConfigProvider::new(
        Arc::new(store),
        cache.clone(),
        config.providers.default_ai_configuration(),
    ));

    let active = config_provider.initialize().await?;
    info!(
        primary_model = %active.primary.model,
        fallback_model = %active.fallback.model,
        confidence_threshold = active.confidence_threshold,
        "AI configuration loaded"
    );

    // Providers follow the endpoint of the configuration active on each turn
    let primary = Arc::new(PrimaryDialogueClient::new(
        LlmProviderFactory::primary_resolver(),
    ));
    let fallback = Arc::new(FallbackDialogueClient::new(
        LlmProviderFactory::fallback_resolver(),
    ));

    let orchestrator = Orchestrator::new(config_provider.clone(), primary, fallback.clone(), cache);
    let extractor = FormDataExtractor::new(config_provider.clone(), fallback);

    Ok(AppState::new(
        config_provider,
        Arc::new(orchestrator),
        Arc::new(extractor),
    ))
}

fn cache_config(config: &AppConfig) -> anyhow::Result<CacheConfig> {
    let cache = &config.cache;

    let cache_config = match cache.backend.parse::<CacheType>()? {
        CacheType::InMemory => CacheConfig::in_memory().with_max_capacity(cache.max_capacity),
        CacheType::Redis => {
            let url = cache.redis_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("cache.redis_url is required for the redis cache backend")
            })?;
            CacheConfig::redis(url)
        }
    };

    Ok(cache_config.with_key_prefix(cache.key_prefix.clone()))
}
