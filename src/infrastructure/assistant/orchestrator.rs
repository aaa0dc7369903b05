//! Conversational turn orchestration: cache, primary model, escalation

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::response_cache::ResponseCache;
use crate::domain::assistant::policy::{DEFAULT_CONFIDENCE, FALLBACK_RETRY_BACKOFF};
use crate::domain::{
    AiConfiguration, AiResponse, Cache, ConfigSource, ConversationTurn, DialogueOptions,
    DomainError, FallbackDialogue, PrimaryDialogue, RetryOutcome, RetryPolicy,
};
use crate::infrastructure::observability::{record_escalation, record_fallback_attempts};

/// Entry point for every conversational turn.
///
/// A turn is served from the response cache when possible, otherwise by the
/// primary model. Answers below the confidence threshold are escalated to the
/// fallback model under a bounded retry policy; when every fallback attempt
/// fails the low-confidence primary answer is returned instead of an error.
pub struct Orchestrator {
    config: Arc<dyn ConfigSource>,
    primary: Arc<dyn PrimaryDialogue>,
    fallback: Arc<dyn FallbackDialogue>,
    responses: ResponseCache,
    retry_backoff: Duration,
}

impl Orchestrator {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        primary: Arc<dyn PrimaryDialogue>,
        fallback: Arc<dyn FallbackDialogue>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            config,
            primary,
            fallback,
            responses: ResponseCache::new(cache),
            retry_backoff: FALLBACK_RETRY_BACKOFF,
        }
    }

    /// Overrides the delay between fallback attempts
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Produces the assistant's reply to `message`.
    ///
    /// Fails only when the configuration cannot be loaded or the primary call fails.
    #[instrument(skip(self, message, history), fields(conversation_id = %conversation_id, language = %language))]
    pub async fn process_message(
        &self,
        conversation_id: &str,
        message: &str,
        language: &str,
        history: &[ConversationTurn],
    ) -> Result<AiResponse, DomainError> {
        let config = self.config.active_config().await?;

        if config.cache_enabled {
            if let Some(cached) = self.responses.lookup(conversation_id, message).await {
                debug!("Serving cached response");
                return Ok(cached);
            }
        }

        let reply = self
            .primary
            .chat(message, language, &DialogueOptions::primary(&config))
            .await?;
        let confidence = reply.confidence();
        let primary_response = AiResponse::new(reply.content, confidence);

        if primary_response.confidence >= config.confidence_threshold {
            debug!(
                confidence = primary_response.confidence,
                "Primary response accepted"
            );
            self.remember(&config, conversation_id, message, &primary_response)
                .await;
            return Ok(primary_response);
        }

        debug!(
            confidence = primary_response.confidence,
            threshold = config.confidence_threshold,
            strategy = %config.fallback_strategy,
            "Escalating to fallback model"
        );

        let options = DialogueOptions::fallback(&config);
        let policy = RetryPolicy::new(config.max_retries, self.retry_backoff);
        let outcome = policy
            .run(|_attempt| self.fallback.chat(history, message, language, &options))
            .await;

        record_fallback_attempts(outcome.attempts());

        match outcome {
            RetryOutcome::Succeeded { value, attempts } => {
                record_escalation("fallback");
                debug!(attempts, "Fallback response accepted");

                let response = AiResponse::new(value.content, DEFAULT_CONFIDENCE);
                self.remember(&config, conversation_id, message, &response)
                    .await;
                Ok(response)
            }
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                record_escalation("degraded");
                warn!(
                    attempts,
                    error = %last_error,
                    confidence = primary_response.confidence,
                    "Fallback exhausted, returning low-confidence primary response"
                );
                Ok(primary_response)
            }
        }
    }

    async fn remember(
        &self,
        config: &AiConfiguration,
        conversation_id: &str,
        message: &str,
        response: &AiResponse,
    ) {
        if config.cache_enabled {
            self.responses
                .store(conversation_id, message, response, config.cache_ttl)
                .await;
        }
    }
}
