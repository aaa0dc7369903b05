//! Process configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, LogFormat, LoggingConfig, ProviderEnvConfig, ProvidersConfig,
    ServerConfig, StorageSettings,
};
