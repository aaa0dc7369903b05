//! Dialogue client abstractions for the primary and fallback models

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use super::config::{AiConfiguration, ProviderSettings};
use super::conversation::ConversationTurn;
use super::policy::DEFAULT_CONFIDENCE;
use crate::domain::llm::ProviderEndpoint;
use crate::domain::DomainError;

/// Sampling parameters passed through to a model provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl SamplingOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Per-call parameters for one dialogue request
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueOptions {
    /// Provider credentials and host, taken from the configuration of this turn
    pub endpoint: ProviderEndpoint,
    pub model: String,
    pub sampling: SamplingOptions,
    /// Upper bound on the provider round trip
    pub timeout: Duration,
}

impl DialogueOptions {
    fn from_settings(settings: &ProviderSettings, timeout_ms: u64) -> Self {
        Self {
            endpoint: settings.endpoint(),
            model: settings.model.clone(),
            sampling: settings.sampling(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Options for the primary model under the given configuration
    pub fn primary(config: &AiConfiguration) -> Self {
        Self::from_settings(&config.primary, config.timeout_ms)
    }

    /// Options for the fallback model under the given configuration
    pub fn fallback(config: &AiConfiguration) -> Self {
        Self::from_settings(&config.fallback, config.timeout_ms)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.sampling = self.sampling.with_temperature(temperature);
        self
    }
}

/// Reply of the primary model
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryReply {
    pub content: String,
    /// Self-reported confidence, absent when the provider did not score its answer
    pub reported_confidence: Option<f32>,
}

impl PrimaryReply {
    pub fn new(content: impl Into<String>, reported_confidence: Option<f32>) -> Self {
        Self {
            content: content.into(),
            reported_confidence,
        }
    }

    /// Confidence used for escalation decisions, clamped to `[0, 1]`
    pub fn confidence(&self) -> f32 {
        self.reported_confidence
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_CONFIDENCE)
    }
}

/// Reply of the fallback model
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackReply {
    pub content: String,
}

impl FallbackReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Regional model serving the first attempt of every turn
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PrimaryDialogue: Send + Sync {
    async fn chat(
        &self,
        message: &str,
        language: &str,
        options: &DialogueOptions,
    ) -> Result<PrimaryReply, DomainError>;
}

/// General-purpose model used for escalation and form-data extraction
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FallbackDialogue: Send + Sync {
    /// Replays `history` and appends `message` as the final user turn
    async fn chat(
        &self,
        history: &[ConversationTurn],
        message: &str,
        language: &str,
        options: &DialogueOptions,
    ) -> Result<FallbackReply, DomainError>;

    /// Sends `history` behind `instruction` in JSON-object output mode
    async fn complete_json(
        &self,
        instruction: &str,
        history: &[ConversationTurn],
        options: &DialogueOptions,
    ) -> Result<FallbackReply, DomainError>;
}
