//! Request and response bodies of the assistant endpoints

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::{ConversationTurn, FormData};

fn default_language() -> String {
    "en".to_string()
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of `POST /v1/conversations/{conversation_id}/messages`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(custom(function = "non_blank", message = "message must not be empty"))]
    pub message: String,
    #[serde(default = "default_language")]
    #[validate(custom(function = "non_blank", message = "language must not be empty"))]
    pub language: String,
    /// Earlier turns, oldest first
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

/// Body of `POST /v1/form-data/extract`
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractFormDataRequest {
    pub history: Vec<ConversationTurn>,
    /// Fields the caller needs; those absent from the result are listed back
    #[serde(default)]
    pub required_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractFormDataResponse {
    pub form_data: FormData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_message_defaults() {
        let request: SendMessageRequest =
            serde_json::from_value(json!({ "message": "Hello" })).unwrap();

        assert_eq!(request.language, "en");
        assert!(request.history.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_message_is_invalid() {
        let request: SendMessageRequest =
            serde_json::from_value(json!({ "message": "   ", "language": "hi" })).unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn test_extract_response_omits_empty_missing_fields() {
        let response = ExtractFormDataResponse {
            form_data: FormData::new(),
            missing_fields: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, json!({ "form_data": {} }));
    }
}
