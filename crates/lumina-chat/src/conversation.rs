//! Conversation history.
//!
//! Holds the user and assistant turns that free chat replays to the
//! endpoint. Personas are never stored here.

use lumina_core::types::Message;

/// Append-only, in-memory record of completed exchanges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange: the user message, then the reply.
    ///
    /// Returns the new length.
    pub fn append_exchange(&mut self, user: Message, reply: impl Into<String>) -> usize {
        self.messages.push(user);
        self.messages.push(Message::assistant(reply));
        self.messages.len()
    }

    /// Build the payload for a chat turn: persona, full history, then input.
    pub fn with_turn(&self, persona: &str, input: &Message) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 2);
        messages.push(Message::system(persona));
        messages.extend(self.messages.iter().cloned());
        messages.push(input.clone());
        messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::types::Role;

    #[test]
    fn test_new_log_is_empty() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert_eq!(log.last(), None);
    }

    #[test]
    fn test_append_exchange_keeps_order() {
        let mut log = ConversationLog::new();
        assert_eq!(log.append_exchange(Message::user("hi"), "hello"), 2);
        assert_eq!(log.append_exchange(Message::user("tips?"), "use spf"), 4);

        let roles: Vec<Role> = log.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(log.last().unwrap().content, "use spf");
    }

    #[test]
    fn test_with_turn_wraps_history() {
        let mut log = ConversationLog::new();
        log.append_exchange(Message::user("first"), "reply");

        let payload = log.with_turn("persona", &Message::user("second"));
        assert_eq!(payload.len(), 4);
        assert_eq!(payload[0], Message::system("persona"));
        assert_eq!(payload[1], Message::user("first"));
        assert_eq!(payload[2], Message::assistant("reply"));
        assert_eq!(payload[3], Message::user("second"));
    }

    #[test]
    fn test_with_turn_does_not_mutate() {
        let log = ConversationLog::new();
        let _ = log.with_turn("persona", &Message::user("q"));
        assert!(log.is_empty());
    }
}
