//! Error types for the chat adapter.

use lumina_core::error::LuminaError;
use lumina_core::types::ExchangeMode;

/// Marker prefixed to every error shown in the chat window.
pub const ERROR_MARKER: &str = "❌";

/// Errors from a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("no products selected")]
    EmptySelection,
    #[error("HTTP error! status: {status}")]
    Transport { status: u16 },
    #[error("{0}")]
    Upstream(String),
    #[error("no content in completion response")]
    EmptyResponse,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ChatError {
    /// The single line shown to the user for this failure.
    pub fn user_message(&self, mode: ExchangeMode) -> String {
        match (self, mode) {
            (ChatError::EmptySelection, _) => format!(
                "{} Please select at least one product to generate a routine.",
                ERROR_MARKER
            ),
            (_, ExchangeMode::Routine) => format!(
                "{} Sorry, I couldn't generate your routine right now ({}). Please try again later.",
                ERROR_MARKER, self
            ),
            (_, ExchangeMode::Chat) => format!(
                "{} Sorry, I couldn't process your message ({}). Please try again.",
                ERROR_MARKER, self
            ),
        }
    }
}

impl From<LuminaError> for ChatError {
    fn from(err: LuminaError) -> Self {
        ChatError::Storage(err.to_string())
    }
}
