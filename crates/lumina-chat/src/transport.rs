//! Transport to the remote completion endpoint.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::error::ChatError;
use crate::protocol::{CompletionRequest, CompletionResponse};

/// Sends one completion request and returns the decoded body.
///
/// Implementations map a non-success status to [`ChatError::Transport`],
/// connection failures to [`ChatError::Network`] and undecodable bodies to
/// [`ChatError::MalformedResponse`]. Interpreting the body (upstream errors,
/// empty replies) is left to the caller.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError>;
}

/// JSON-over-HTTP transport posting to a single URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError> {
        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            "Posting completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Transport {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ChatError::MalformedResponse(e.to_string()))
    }
}
