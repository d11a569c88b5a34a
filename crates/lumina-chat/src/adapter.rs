//! Chat protocol adapter.
//!
//! Runs the two kinds of exchange against a [`CompletionTransport`]: routine
//! generation from the current selection, and free chat carrying the full
//! conversation history. One exchange per session is in flight at a time;
//! anything submitted meanwhile is dropped.

use tracing::{debug, info, warn};

use lumina_core::error::LuminaError;
use lumina_core::events::SessionEvent;
use lumina_core::types::{ExchangeMode, Message, ProductSummary};

use crate::display::Lane;
use crate::error::ChatError;
use crate::persona::{
    CHAT_PERSONA, ROUTINE_CAPTION, ROUTINE_PERSONA, ROUTINE_REQUEST_PREFIX, THINKING,
};
use crate::protocol::CompletionRequest;
use crate::session::Session;
use crate::transport::CompletionTransport;

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// The endpoint answered; the reply is in both logs.
    Replied(String),
    /// Another exchange was in flight; nothing happened.
    Busy,
    /// Empty chat input; nothing happened.
    Ignored,
    /// The error has already been shown in the chat window.
    Failed(ChatError),
}

impl Exchange {
    pub fn reply(&self) -> Option<&str> {
        match self {
            Exchange::Replied(reply) => Some(reply),
            _ => None,
        }
    }

    pub fn is_replied(&self) -> bool {
        matches!(self, Exchange::Replied(_))
    }
}

pub struct ChatAdapter<T> {
    transport: T,
}

impl<T: CompletionTransport> ChatAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask for a routine built from the selected products.
    ///
    /// An empty selection is reported even while another exchange is in
    /// flight. History is neither sent nor consulted.
    pub async fn generate_routine(&self, session: &Session) -> Exchange {
        let mode = ExchangeMode::Routine;
        let summaries = session.selection_summaries();
        if summaries.is_empty() {
            return surface(session, mode, ChatError::EmptySelection);
        }

        let Some(guard) = session.try_begin() else {
            debug!(?mode, "Exchange in flight; routine request dropped");
            return Exchange::Busy;
        };
        session.events().publish(SessionEvent::ExchangeStarted { mode });
        info!(products = summaries.len(), "Generating routine");

        let outcome = match routine_message(&summaries) {
            Ok(user) => {
                let request =
                    CompletionRequest::new(vec![Message::system(ROUTINE_PERSONA), user.clone()]);
                match self.complete(&request).await {
                    Ok(reply) => {
                        session.record_exchange(user, &reply);
                        session.show(Lane::User, ROUTINE_CAPTION);
                        session.show(Lane::Ai, &reply);
                        Exchange::Replied(reply)
                    }
                    Err(e) => surface(session, mode, e),
                }
            }
            Err(e) => surface(session, mode, e),
        };

        drop(guard);
        finish(session, mode, &outcome);
        outcome
    }

    /// Send one free-chat message.
    ///
    /// The input is trimmed; blank input is ignored before the in-flight
    /// check.
    pub async fn ask(&self, session: &Session, input: &str) -> Exchange {
        let mode = ExchangeMode::Chat;
        let text = input.trim();
        if text.is_empty() {
            return Exchange::Ignored;
        }

        let Some(guard) = session.try_begin() else {
            debug!(?mode, "Exchange in flight; message dropped");
            return Exchange::Busy;
        };
        session.events().publish(SessionEvent::ExchangeStarted { mode });

        session.show(Lane::User, text);
        let loading = session.show(Lane::Loading, THINKING);

        let user = Message::user(text);
        let request = CompletionRequest::new(session.chat_payload(CHAT_PERSONA, &user));
        debug!(messages = request.messages.len(), "Sending chat turn");
        let result = self.complete(&request).await;
        session.hide(loading);

        let outcome = match result {
            Ok(reply) => {
                session.record_exchange(user, &reply);
                session.show(Lane::Ai, &reply);
                Exchange::Replied(reply)
            }
            Err(e) => surface(session, mode, e),
        };

        drop(guard);
        finish(session, mode, &outcome);
        outcome
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        self.transport.complete(request).await?.into_content()
    }
}

/// The synthesized user message for routine generation.
pub fn routine_message(summaries: &[ProductSummary]) -> Result<Message, ChatError> {
    let json = serde_json::to_string_pretty(summaries).map_err(LuminaError::from)?;
    Ok(Message::user(format!("{}{}", ROUTINE_REQUEST_PREFIX, json)))
}

fn surface(session: &Session, mode: ExchangeMode, err: ChatError) -> Exchange {
    warn!(?mode, error = %err, "Exchange failed");
    session.show(Lane::Ai, &err.user_message(mode));
    Exchange::Failed(err)
}

fn finish(session: &Session, mode: ExchangeMode, outcome: &Exchange) {
    let succeeded = outcome.is_replied();
    info!(?mode, succeeded, "Exchange finished");
    session
        .events()
        .publish(SessionEvent::ExchangeFinished { mode, succeeded });
}

// =============================================================================
// Tests
// =============================================================================
