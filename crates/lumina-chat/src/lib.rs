//! Beauty-assistant chat for Lumina.
//!
//! Wraps the remote completion endpoint: builds routine and chat requests,
//! keeps the conversation history and the chat window, and turns replies
//! into formatted documents.

pub mod adapter;
pub mod conversation;
pub mod display;
pub mod error;
pub mod formatter;
pub mod persona;
pub mod protocol;
pub mod session;
pub mod transport;

pub use adapter::{ChatAdapter, Exchange};
pub use conversation::ConversationLog;
pub use display::{DisplayEntry, DisplayLog, Lane};
pub use error::ChatError;
pub use formatter::{format_response, Block, Document, HeadingLevel, Span};
pub use protocol::{CompletionRequest, CompletionResponse};
pub use session::Session;
pub use transport::{CompletionTransport, HttpTransport};
