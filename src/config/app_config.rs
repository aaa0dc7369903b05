use serde::Deserialize;

use crate::domain::{AiConfiguration, ProviderSettings};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where the AI configuration record is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// `in_memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
}

/// Backend shared by the response cache and the configuration cache
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

/// Environment-derived provider defaults, used until an administrator saves a configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "ProviderEnvConfig::primary")]
    pub primary: ProviderEnvConfig,
    #[serde(default = "ProviderEnvConfig::fallback")]
    pub fallback: ProviderEnvConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEnvConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ProviderEnvConfig {
    fn primary() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.sarvam.ai".to_string(),
            model: "sarvam-m".to_string(),
        }
    }

    fn fallback() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings::new(&self.api_key, &self.base_url, &self.model)
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: ProviderEnvConfig::primary(),
            fallback: ProviderEnvConfig::fallback(),
        }
    }
}

fn default_key_prefix() -> String {
    "scheme-assistant".to_string()
}

fn default_max_capacity() -> u64 {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            database_url: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: default_key_prefix(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl ProvidersConfig {
    /// Configuration synthesized when no record has been saved yet
    pub fn default_ai_configuration(&self) -> AiConfiguration {
        AiConfiguration::with_defaults(self.primary.to_settings(), self.fallback.to_settings())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
