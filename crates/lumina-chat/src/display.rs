//! Chat window contents.
//!
//! The display log is what the user sees, which is not the same as what the
//! endpoint sees: captions, loading placeholders and error lines live here
//! and never reach the [`ConversationLog`](crate::conversation::ConversationLog).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ERROR_MARKER;
use crate::formatter::{format_response, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    User,
    Ai,
    Loading,
}

/// One line in the chat window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub id: Uuid,
    pub lane: Lane,
    /// Source text as received.
    pub text: String,
    /// Formatted body; `None` for loading entries, which render as plain text.
    pub document: Option<Document>,
    pub created_at: DateTime<Utc>,
}

impl DisplayEntry {
    fn new(lane: Lane, text: &str) -> Self {
        let document = match lane {
            Lane::Loading => None,
            Lane::User | Lane::Ai => Some(format_response(text)),
        };
        Self {
            id: Uuid::new_v4(),
            lane,
            text: text.to_string(),
            document,
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.lane == Lane::Ai && self.text.starts_with(ERROR_MARKER)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayLog {
    entries: Vec<DisplayEntry>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its id.
    pub fn push(&mut self, lane: Lane, text: &str) -> Uuid {
        let entry = DisplayEntry::new(lane, text);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Remove an entry by id. Returns whether it was present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_formats_user_and_ai() {
        let mut log = DisplayLog::new();
        log.push(Lane::User, "**hi**");
        log.push(Lane::Ai, "## Routine");

        assert!(log.entries()[0].document.is_some());
        assert_eq!(
            log.entries()[1].document.as_ref().unwrap().plain_text(),
            "Routine"
        );
    }

    #[test]
    fn test_loading_is_plain() {
        let mut log = DisplayLog::new();
        log.push(Lane::Loading, "Thinking...");
        assert_eq!(log.entries()[0].document, None);
        assert_eq!(log.entries()[0].text, "Thinking...");
    }

    #[test]
    fn test_remove_by_id() {
        let mut log = DisplayLog::new();
        let keep = log.push(Lane::User, "question");
        let loading = log.push(Lane::Loading, "Thinking...");

        assert!(log.remove(loading));
        assert!(!log.remove(loading));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].id, keep);
    }

    #[test]
    fn test_error_entries() {
        let mut log = DisplayLog::new();
        log.push(Lane::Ai, "All good");
        log.push(Lane::Ai, "❌ Sorry, something broke");
        log.push(Lane::User, "❌ typed by the user");

        let errors: Vec<_> = log.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].text.contains("something broke"));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut log = DisplayLog::new();
        let a = log.push(Lane::Ai, "same");
        let b = log.push(Lane::Ai, "same");
        assert_ne!(a, b);
    }
}
