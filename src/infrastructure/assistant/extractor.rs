//! Structured form-data extraction from a finished conversation

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::assistant::policy::EXTRACTION_TEMPERATURE;
use crate::domain::{
    ConfigSource, ConversationTurn, DialogueOptions, DomainError, FallbackDialogue, FormData,
};

/// System instruction sent ahead of the conversation
pub const EXTRACTION_INSTRUCTION: &str = "Extract every form field the user provided in the \
conversation below. Respond with a single JSON object whose keys are snake_case field names \
and whose values are the values given by the user. Omit fields the user did not provide. \
Output only the JSON object, without any explanation.";

/// Turns a conversation into field values using the fallback model in JSON mode.
///
/// Extraction never fails: any error yields an empty [`FormData`].
pub struct FormDataExtractor {
    config: Arc<dyn ConfigSource>,
    fallback: Arc<dyn FallbackDialogue>,
}

impl FormDataExtractor {
    pub fn new(config: Arc<dyn ConfigSource>, fallback: Arc<dyn FallbackDialogue>) -> Self {
        Self { config, fallback }
    }

    pub async fn extract_form_data(&self, history: &[ConversationTurn]) -> FormData {
        if history.is_empty() {
            debug!("Empty conversation, nothing to extract");
            return FormData::new();
        }

        match self.try_extract(history).await {
            Ok(form_data) => {
                debug!(fields = form_data.len(), "Form data extracted");
                form_data
            }
            Err(e) => {
                warn!(error = %e, "Form-data extraction failed, returning empty mapping");
                FormData::new()
            }
        }
    }

    async fn try_extract(&self, history: &[ConversationTurn]) -> Result<FormData, DomainError> {
        let config = self.config.active_config().await?;
        let options = DialogueOptions::fallback(&config).with_temperature(EXTRACTION_TEMPERATURE);

        let reply = self
            .fallback
            .complete_json(EXTRACTION_INSTRUCTION, history, &options)
            .await?;

        parse_form_data(&reply.content)
    }
}

/// Parses the model output, tolerating a surrounding markdown code fence
fn parse_form_data(content: &str) -> Result<FormData, DomainError> {
    let json = strip_code_fence(content.trim());

    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        DomainError::provider("fallback", format!("Extraction output is not JSON: {}", e))
    })?;

    FormData::from_json(value).ok_or_else(|| {
        DomainError::provider("fallback", "Extraction output is not a JSON object")
    })
}

fn strip_code_fence(content: &str) -> &str {
    let Some(inner) = content.strip_prefix("```") else {
        return content;
    };

    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
