use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use super::openai::{OpenAiMessage, OpenAiUsage};
use crate::domain::{DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, Usage};

/// Multilingual regional chat provider.
///
/// Speaks the chat-completions dialect plus a `language` request field, and may
/// report a `confidence` score for its answer either at the top level or on the
/// first choice.
#[derive(Debug)]
pub struct RegionalProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> RegionalProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> =
            request.messages.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(ref language) = request.language {
            body["language"] = serde_json::json!(language);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        if let Some(presence_penalty) = request.presence_penalty {
            body["presence_penalty"] = serde_json::json!(presence_penalty);
        }

        if let Some(frequency_penalty) = request.frequency_penalty {
            body["frequency_penalty"] = serde_json::json!(frequency_penalty);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: RegionalResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("regional", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("regional", "No choices in response"))?;

        let confidence = response.confidence.or(choice.confidence);
        let message = Message::assistant(choice.message.content.unwrap_or_default());

        let mut llm_response = LlmResponse::new(
            response.id.unwrap_or_default(),
            response.model.unwrap_or_default(),
            message,
        );

        if let Some(confidence) = confidence {
            llm_response = llm_response.with_confidence(confidence);
        }

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response = llm_response.with_usage(Usage::new(
                usage.prompt_tokens,
                usage.completion_tokens,
            ));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for RegionalProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "regional"
    }
}

#[derive(Debug, Deserialize)]
struct RegionalResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<RegionalChoice>,
    confidence: Option<f32>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct RegionalChoice {
    message: RegionalMessage,
    finish_reason: Option<String>,
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct RegionalMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const BASE_URL: &str = "https://regional.example";
    const TEST_URL: &str = "https://regional.example/v1/chat/completions";

    #[tokio::test]
    async fn test_regional_chat_with_confidence() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({
                "id": "r-1",
                "model": "regional-chat",
                "choices": [{ "message": { "content": "नमस्ते" }, "finish_reason": "stop" }],
                "confidence": 0.82
            }),
        );
        let provider = RegionalProvider::new(client, "key", BASE_URL);

        let request = LlmRequest::builder().user("Hello").language("hi").build();
        let response = provider.chat("regional-chat", request).await.unwrap();

        assert_eq!(response.content(), "नमस्ते");
        assert_eq!(response.confidence, Some(0.82));
    }

    #[tokio::test]
    async fn test_regional_choice_level_confidence() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({
                "choices": [{ "message": { "content": "Hi" }, "confidence": 0.4 }]
            }),
        );
        let provider = RegionalProvider::new(client, "key", BASE_URL);

        let response = provider
            .chat("regional-chat", LlmRequest::builder().user("Hi").build())
            .await
            .unwrap();

        assert_eq!(response.confidence, Some(0.4));
    }

    #[tokio::test]
    async fn test_regional_unscored_response() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({
                "id": "r-2",
                "model": "regional-chat",
                "choices": [{ "message": { "content": "Hello" } }]
            }),
        );
        let provider = RegionalProvider::new(client, "key", BASE_URL);

        let response = provider
            .chat("regional-chat", LlmRequest::builder().user("Hi").build())
            .await
            .unwrap();

        assert!(response.confidence.is_none());
    }

    #[tokio::test]
    async fn test_regional_request_carries_language() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({ "choices": [{ "message": { "content": "ok" } }] }),
        );
        let provider = RegionalProvider::new(client, "secret", BASE_URL);

        let request = LlmRequest::builder()
            .user("Hola")
            .language("es")
            .temperature(0.3)
            .top_p(0.9)
            .build();
        provider.chat("regional-chat", request).await.unwrap();

        let body = provider.client.last_body().unwrap();
        assert_eq!(body["language"], "es");
        assert_eq!(body["model"], "regional-chat");
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("response_format").is_none());
        assert_eq!(
            provider.client.header("Authorization").as_deref(),
            Some("Bearer secret")
        );
    }

    #[tokio::test]
    async fn test_regional_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 500");
        let provider = RegionalProvider::new(client, "key", BASE_URL);

        let result = provider
            .chat("regional-chat", LlmRequest::builder().user("Hi").build())
            .await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
