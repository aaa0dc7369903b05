//! AI behaviour configuration entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dialogue::SamplingOptions;
use super::policy::MAX_CACHE_TTL_SECS;
use crate::domain::llm::ProviderEndpoint;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::DomainError;

const SINGLETON_ID: &str = "active";

/// Identifier of the configuration record. Only one record may exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiConfigurationId(String);

impl AiConfigurationId {
    pub fn singleton() -> Self {
        Self(SINGLETON_ID.to_string())
    }
}

impl StorageKey for AiConfigurationId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the assistant does when the primary model is not confident enough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    #[default]
    Retry,
    Clarify,
    Human,
}

impl FallbackStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackStrategy::Retry => "retry",
            FallbackStrategy::Clarify => "clarify",
            FallbackStrategy::Human => "human",
        }
    }
}

impl std::fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection and sampling parameters for one model provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProviderSettings {
    pub api_key: String,
    #[validate(length(min = 1, message = "base_url must not be empty"))]
    pub base_url: String,
    #[validate(length(min = 1, message = "model must not be empty"))]
    pub model: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f32,
    #[validate(range(min = -2.0, max = 2.0))]
    pub frequency_penalty: f32,
    #[validate(range(min = -2.0, max = 2.0))]
    pub presence_penalty: f32,
}

impl ProviderSettings {
    /// Settings with the default sampling parameters
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }

    pub fn endpoint(&self) -> ProviderEndpoint {
        ProviderEndpoint::new(&self.api_key, &self.base_url)
    }

    pub fn sampling(&self) -> SamplingOptions {
        SamplingOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
        }
    }

    fn masked(&self) -> Self {
        Self {
            api_key: mask_secret(&self.api_key),
            ..self.clone()
        }
    }

    fn keep_secret_from(&mut self, current: &ProviderSettings) {
        if self.api_key.is_empty() || self.api_key.starts_with(MASK) {
            self.api_key = current.api_key.clone();
        }
    }
}

const MASK: &str = "****";

fn mask_secret(secret: &str) -> String {
    let visible: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if secret.chars().count() <= 4 {
        MASK.to_string()
    } else {
        format!("{}{}", MASK, visible)
    }
}

/// The single AI behaviour record consulted for every conversational turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AiConfiguration {
    #[serde(skip, default = "AiConfigurationId::singleton")]
    id: AiConfigurationId,
    #[validate(nested)]
    pub primary: ProviderSettings,
    #[validate(nested)]
    pub fallback: ProviderSettings,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_threshold: f32,
    #[serde(default)]
    pub fallback_strategy: FallbackStrategy,
    pub max_retries: u32,
    #[validate(range(min = 1000))]
    pub timeout_ms: u64,
    pub cache_enabled: bool,
    /// Response cache time-to-live in seconds
    #[validate(range(max = MAX_CACHE_TTL_SECS))]
    pub cache_ttl: u64,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl AiConfiguration {
    /// Configuration used at first boot, before an administrator saved one
    pub fn with_defaults(primary: ProviderSettings, fallback: ProviderSettings) -> Self {
        Self {
            id: AiConfigurationId::singleton(),
            primary,
            fallback,
            confidence_threshold: 0.7,
            fallback_strategy: FallbackStrategy::Retry,
            max_retries: 3,
            timeout_ms: 30_000,
            cache_enabled: true,
            cache_ttl: 3600,
            updated_at: Utc::now(),
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_cache(mut self, enabled: bool, ttl_secs: u64) -> Self {
        self.cache_enabled = enabled;
        self.cache_ttl = ttl_secs;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_fallback_strategy(mut self, strategy: FallbackStrategy) -> Self {
        self.fallback_strategy = strategy;
        self
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Checks every range invariant of the record
    pub fn validated(self) -> Result<Self, DomainError> {
        self.validate()
            .map_err(|e| DomainError::validation(format!("Invalid AI configuration: {}", e)))?;
        Ok(self)
    }

    /// Copy safe to hand out over the admin API
    pub fn masked(&self) -> Self {
        Self {
            primary: self.primary.masked(),
            fallback: self.fallback.masked(),
            ..self.clone()
        }
    }

    /// Restores API keys that came back empty or masked from `current`
    pub fn with_secrets_from(mut self, current: &AiConfiguration) -> Self {
        self.primary.keep_secret_from(&current.primary);
        self.fallback.keep_secret_from(&current.fallback);
        self
    }
}

impl StorageEntity for AiConfiguration {
    type Key = AiConfigurationId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

#[cfg(test)]
pub(crate) fn test_configuration() -> AiConfiguration {
    AiConfiguration::with_defaults(
        ProviderSettings::new("primary-key-1234", "https://regional.example", "regional-chat"),
        ProviderSettings::new("fallback-key-5678", "https://fallback.example", "gpt-4o-mini"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = test_configuration();

        assert_eq!(config.key().as_str(), "active");
        assert_eq!(config.fallback_strategy, FallbackStrategy::Retry);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let config = test_configuration().with_confidence_threshold(1.5);

        let result = config.validated();
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_timeout_below_minimum_is_rejected() {
        let config = test_configuration().with_timeout_ms(500);
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_cache_ttl_upper_bound() {
        let at_limit = test_configuration().with_cache(true, MAX_CACHE_TTL_SECS);
        assert!(at_limit.validated().is_ok());

        let beyond = test_configuration().with_cache(true, MAX_CACHE_TTL_SECS + 1);
        assert!(matches!(
            beyond.validated(),
            Err(DomainError::Validation { .. })
        ));

        let overflowing = test_configuration().with_cache(true, u64::MAX);
        assert!(overflowing.validated().is_err());
    }

    #[test]
    fn test_nested_provider_settings_are_validated() {
        let mut config = test_configuration();
        config.primary.frequency_penalty = 2.5;
        assert!(config.clone().validated().is_err());

        config.primary.frequency_penalty = -2.0;
        config.fallback.max_tokens = 0;
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_masked_hides_api_keys() {
        let masked = test_configuration().masked();

        assert_eq!(masked.primary.api_key, "****1234");
        assert_eq!(masked.fallback.api_key, "****5678");
        assert_eq!(masked.primary.model, "regional-chat");
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_fallback_strategy_serialization() {
        let json = serde_json::to_string(&FallbackStrategy::Human).unwrap();
        assert_eq!(json, "\"human\"");

        let parsed: FallbackStrategy = serde_json::from_str("\"clarify\"").unwrap();
        assert_eq!(parsed, FallbackStrategy::Clarify);
    }

    #[test]
    fn test_sampling_options_follow_settings() {
        let settings = ProviderSettings::new("k", "https://x", "m");
        let sampling = settings.sampling();

        assert_eq!(sampling.temperature, 0.7);
        assert_eq!(sampling.max_tokens, 1000);
        assert_eq!(sampling.top_p, 1.0);
    }

    #[test]
    fn test_masked_keys_are_restored_on_save() {
        let current = test_configuration();
        let mut incoming = current.masked().with_confidence_threshold(0.5);
        incoming.fallback.api_key = "new-fallback-key".to_string();

        let merged = incoming.with_secrets_from(&current);

        assert_eq!(merged.primary.api_key, "primary-key-1234");
        assert_eq!(merged.fallback.api_key, "new-fallback-key");
        assert_eq!(merged.confidence_threshold, 0.5);
    }

    #[test]
    fn test_deserialized_record_is_always_the_singleton() {
        let mut json = serde_json::to_value(test_configuration()).unwrap();
        assert!(json.get("id").is_none());
        json["id"] = serde_json::json!("other");

        let parsed: AiConfiguration = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.key(), &AiConfigurationId::singleton());
    }
}
