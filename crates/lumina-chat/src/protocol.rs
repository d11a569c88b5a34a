//! Wire format of the completion endpoint.
//!
//! Requests carry an ordered list of role-tagged messages. Responses carry
//! either `choices[0].message.content` or an `error` field, which may be a
//! plain string or an object with a `message`.

use serde::{Deserialize, Serialize};

use lumina_core::types::Message;

use crate::error::ChatError;

/// Request body: `{"messages": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Response body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<UpstreamError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// The `error` field as the endpoint reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpstreamError {
    Text(String),
    Detail { message: String },
    Other(serde_json::Value),
}

impl UpstreamError {
    /// Human-readable message, or `None` for falsy values (`""`, `false`, `0`).
    pub fn message(&self) -> Option<String> {
        match self {
            UpstreamError::Text(text) if text.is_empty() => None,
            UpstreamError::Text(text) => Some(text.clone()),
            UpstreamError::Detail { message } => Some(message.clone()),
            UpstreamError::Other(value) => match value {
                serde_json::Value::Null | serde_json::Value::Bool(false) => None,
                serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
                other => Some(other.to_string()),
            },
        }
    }
}

impl CompletionResponse {
    /// Response with a single reply.
    pub fn reply(content: impl Into<String>) -> Self {
        Self {
            choices: Some(vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(content.into()),
                }),
            }]),
            error: None,
        }
    }

    /// Extract the reply text.
    ///
    /// An upstream error wins over any choices; a missing or empty first
    /// choice is [`ChatError::EmptyResponse`].
    pub fn into_content(self) -> Result<String, ChatError> {
        if let Some(message) = self.error.as_ref().and_then(UpstreamError::message) {
            return Err(ChatError::Upstream(message));
        }

        self.choices
            .into_iter()
            .flatten()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}
