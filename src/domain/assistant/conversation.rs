//! Conversation turns, assistant replies and extracted form data

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One entry of a conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub content: String,
    pub sender: Sender,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            language: language.into(),
            confidence: None,
            timestamp: Utc::now(),
        }
    }

    pub fn ai(content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Ai,
            language: language.into(),
            confidence: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Reply produced for one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub content: String,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FormData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl AiResponse {
    pub fn new(content: impl Into<String>, confidence: f32) -> Self {
        Self {
            content: content.into(),
            confidence,
            form_data: None,
            is_complete: None,
        }
    }
}

/// Structured field values extracted from a conversation.
///
/// Keys are the field names the model produced; an empty map means nothing
/// could be extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Value>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds form data from a parsed JSON document; anything but an object is rejected
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map.into_iter().collect())),
            _ => None,
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Required fields that are absent or null
    pub fn missing_fields(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|field| matches!(self.0.get(field.as_str()), None | Some(Value::Null)))
            .cloned()
            .collect()
    }
}
