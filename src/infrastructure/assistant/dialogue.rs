//! Dialogue clients adapting model providers to the assistant's dialogue traits

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::assistant::policy::DEFAULT_CONFIDENCE;
use crate::domain::{
    ConversationTurn, DialogueOptions, DomainError, FallbackDialogue, FallbackReply, LlmProvider,
    LlmRequest, LlmRequestBuilder, LlmResponse, Message, PrimaryDialogue, PrimaryReply,
    ProviderResolver, SamplingOptions, StaticProviderResolver,
};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

fn fallback_system_prompt(language: &str) -> String {
    format!(
        "You are a friendly assistant helping citizens fill in government scheme \
         application forms. Ask for one missing detail at a time, keep answers short \
         and reply in the language with code '{}'.",
        language
    )
}

fn with_sampling(builder: LlmRequestBuilder, sampling: &SamplingOptions) -> LlmRequestBuilder {
    builder
        .temperature(sampling.temperature)
        .max_tokens(sampling.max_tokens)
        .top_p(sampling.top_p)
        .frequency_penalty(sampling.frequency_penalty)
        .presence_penalty(sampling.presence_penalty)
}

fn history_messages(history: &[ConversationTurn]) -> impl Iterator<Item = Message> + '_ {
    history.iter().map(|turn| {
        if turn.is_user() {
            Message::user(turn.content.clone())
        } else {
            Message::assistant(turn.content.clone())
        }
    })
}

/// Sends one request to the provider for `options.endpoint`, bounded by the
/// configured timeout, and records its metrics
async fn call_provider(
    resolver: &dyn ProviderResolver,
    options: &DialogueOptions,
    request: LlmRequest,
) -> Result<LlmResponse, DomainError> {
    let provider = resolver.resolve(&options.endpoint).await?;
    let start = Instant::now();

    let result = match tokio::time::timeout(options.timeout, provider.chat(&options.model, request))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(DomainError::timeout(
            provider.provider_name(),
            options.timeout.as_millis() as u64,
        )),
    };

    let usage = result.as_ref().ok().and_then(|r| r.usage.as_ref());
    record_llm_request(LlmRequestMetricParams {
        provider: provider.provider_name(),
        model: &options.model,
        duration: start.elapsed(),
        success: result.is_ok(),
        input_tokens: usage.map(|u| u64::from(u.prompt_tokens)),
        output_tokens: usage.map(|u| u64::from(u.completion_tokens)),
    });

    result
}

/// Primary dialogue over the regional provider
#[derive(Debug, Clone)]
pub struct PrimaryDialogueClient {
    providers: Arc<dyn ProviderResolver>,
}

impl PrimaryDialogueClient {
    pub fn new(providers: Arc<dyn ProviderResolver>) -> Self {
        Self { providers }
    }

    /// Client pinned to one provider regardless of the configured endpoint
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(Arc::new(StaticProviderResolver::new(provider)))
    }
}

#[async_trait]
impl PrimaryDialogue for PrimaryDialogueClient {
    async fn chat(
        &self,
        message: &str,
        language: &str,
        options: &DialogueOptions,
    ) -> Result<PrimaryReply, DomainError> {
        let request = with_sampling(
            LlmRequest::builder().user(message).language(language),
            &options.sampling,
        )
        .build();

        let response = call_provider(self.providers.as_ref(), options, request).await?;

        if response.confidence.is_none() {
            warn!(
                model = %options.model,
                assumed = DEFAULT_CONFIDENCE,
                "Primary response carried no confidence score"
            );
        }

        Ok(PrimaryReply::new(response.content(), response.confidence))
    }
}

/// Fallback dialogue over the general-purpose provider
#[derive(Debug, Clone)]
pub struct FallbackDialogueClient {
    providers: Arc<dyn ProviderResolver>,
}

impl FallbackDialogueClient {
    pub fn new(providers: Arc<dyn ProviderResolver>) -> Self {
        Self { providers }
    }

    /// Client pinned to one provider regardless of the configured endpoint
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(Arc::new(StaticProviderResolver::new(provider)))
    }
}

#[async_trait]
impl FallbackDialogue for FallbackDialogueClient {
    async fn chat(
        &self,
        history: &[ConversationTurn],
        message: &str,
        language: &str,
        options: &DialogueOptions,
    ) -> Result<FallbackReply, DomainError> {
        let mut messages = vec![Message::system(fallback_system_prompt(language))];
        messages.extend(history_messages(history));
        messages.push(Message::user(message));

        debug!(turns = history.len(), "Sending conversation to fallback model");

        let request = with_sampling(LlmRequest::builder().messages(messages), &options.sampling)
            .build();
        let response = call_provider(self.providers.as_ref(), options, request).await?;

        Ok(FallbackReply::new(response.content()))
    }

    async fn complete_json(
        &self,
        instruction: &str,
        history: &[ConversationTurn],
        options: &DialogueOptions,
    ) -> Result<FallbackReply, DomainError> {
        let mut messages = vec![Message::system(instruction)];
        messages.extend(history_messages(history));

        let request = with_sampling(
            LlmRequest::builder().messages(messages).json_output(),
            &options.sampling,
        )
        .build();
        let response = call_provider(self.providers.as_ref(), options, request).await?;

        Ok(FallbackReply::new(response.content()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assistant::test_configuration;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::{MessageRole, ProviderSettings, Usage};
    use crate::infrastructure::llm::{CachedProviderResolver, MockHttpClient, RegionalProvider};
    use std::time::Duration;

    fn reply(content: &str) -> LlmResponse {
        LlmResponse::new("id".to_string(), "model".to_string(), Message::assistant(content))
    }

    #[derive(Debug)]
    struct SlowProvider;

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn chat(&self, _model: &str, _request: LlmRequest) -> Result<LlmResponse, DomainError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(reply("too late"))
        }

        fn provider_name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_primary_passes_language_and_sampling() {
        let provider = Arc::new(
            MockLlmProvider::new("regional").with_response(reply("नमस्ते").with_confidence(0.8)),
        );
        let client = PrimaryDialogueClient::with_provider(provider.clone());
        let options = DialogueOptions::primary(&test_configuration());

        let result = client.chat("hello", "hi", &options).await.unwrap();

        assert_eq!(result.content, "नमस्ते");
        assert_eq!(result.reported_confidence, Some(0.8));

        let requests = provider.requests();
        let (model, request) = &requests[0];
        assert_eq!(model, "regional-chat");
        assert_eq!(request.language.as_deref(), Some("hi"));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1000));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content_text(), "hello");
    }

    #[tokio::test]
    async fn test_primary_without_score_uses_default_confidence() {
        let provider = Arc::new(MockLlmProvider::new("regional").with_response(reply("ok")));
        let client = PrimaryDialogueClient::with_provider(provider);

        let result = client
            .chat("hi", "en", &DialogueOptions::primary(&test_configuration()))
            .await
            .unwrap();

        assert!(result.reported_confidence.is_none());
        assert_eq!(result.confidence(), DEFAULT_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_primary_provider_error_propagates() {
        let provider = Arc::new(MockLlmProvider::new("regional").with_error("HTTP 503"));
        let client = PrimaryDialogueClient::with_provider(provider);

        let result = client
            .chat("hi", "en", &DialogueOptions::primary(&test_configuration()))
            .await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let client = PrimaryDialogueClient::with_provider(Arc::new(SlowProvider));
        let options = DialogueOptions::primary(&test_configuration().with_timeout_ms(2_000));

        let result = client.chat("hi", "en", &options).await;

        match result {
            Err(DomainError::Timeout {
                provider,
                timeout_ms,
            }) => {
                assert_eq!(provider, "slow");
                assert_eq!(timeout_ms, 2_000);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fallback_replays_history_then_message() {
        let provider = Arc::new(
            MockLlmProvider::new("openai")
                .with_response(reply("What is your age?").with_usage(Usage::new(30, 5))),
        );
        let client = FallbackDialogueClient::with_provider(provider.clone());
        let history = vec![
            ConversationTurn::user("I want to apply", "en"),
            ConversationTurn::ai("Sure, what is your name?", "en"),
        ];

        let result = client
            .chat(
                &history,
                "Asha",
                "en",
                &DialogueOptions::fallback(&test_configuration()),
            )
            .await
            .unwrap();

        assert_eq!(result.content, "What is your age?");

        let (model, request) = &provider.requests()[0];
        assert_eq!(model, "gpt-4o-mini");
        let roles: Vec<_> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert!(request.messages[0].content_text().contains("'en'"));
        assert_eq!(request.messages[3].content_text(), "Asha");
        assert!(!request.wants_json());
    }

    #[tokio::test]
    async fn test_complete_json_requests_json_object() {
        let provider =
            Arc::new(MockLlmProvider::new("openai").with_response(reply(r#"{"name":"Asha"}"#)));
        let client = FallbackDialogueClient::with_provider(provider.clone());
        let history = vec![ConversationTurn::user("My name is Asha", "en")];
        let options = DialogueOptions::fallback(&test_configuration()).with_temperature(0.1);

        let result = client
            .complete_json("Extract the fields", &history, &options)
            .await
            .unwrap();

        assert_eq!(result.content, r#"{"name":"Asha"}"#);

        let (_, request) = &provider.requests()[0];
        assert!(request.wants_json());
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.messages[0].content_text(), "Extract the fields");
        assert_eq!(request.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_rotated_key_and_host_reach_http_client() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_response(
                    "https://old.example/v1/chat/completions",
                    serde_json::json!({ "choices": [{ "message": { "content": "old" } }] }),
                )
                .with_response(
                    "https://new.example/v1/chat/completions",
                    serde_json::json!({ "choices": [{ "message": { "content": "new" } }] }),
                ),
        );
        let shared = http.clone();
        let resolver = CachedProviderResolver::new(move |endpoint| {
            Arc::new(RegionalProvider::new(
                shared.clone(),
                endpoint.api_key.clone(),
                endpoint.base_url.clone(),
            ))
        });
        let client = PrimaryDialogueClient::new(Arc::new(resolver));

        let mut config = test_configuration();
        config.primary = ProviderSettings::new("old-key", "https://old.example", "regional-chat");
        let reply = client
            .chat("hi", "en", &DialogueOptions::primary(&config))
            .await
            .unwrap();
        assert_eq!(reply.content, "old");
        assert_eq!(http.header("Authorization").as_deref(), Some("Bearer old-key"));

        config.primary = ProviderSettings::new("new-key", "https://new.example", "regional-chat");
        let reply = client
            .chat("hi", "en", &DialogueOptions::primary(&config))
            .await
            .unwrap();
        assert_eq!(reply.content, "new");
        assert_eq!(http.header("Authorization").as_deref(), Some("Bearer new-key"));
    }
}
