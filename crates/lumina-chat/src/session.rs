//! Per-user session state.
//!
//! A [`Session`] owns the selection, the conversation history, the chat
//! window and the in-flight flag. It is shared by reference between the
//! input loop and the adapter; every piece of state sits behind its own
//! `std::sync::Mutex`, and no lock is held across an `.await`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};
use uuid::Uuid;

use lumina_core::catalog::Catalog;
use lumina_core::events::{EventBus, SessionEvent};
use lumina_core::selection::{SelectionChange, SelectionSet};
use lumina_core::store::KeyValueStore;
use lumina_core::types::{Message, Product, ProductId, ProductSummary};

use crate::conversation::ConversationLog;
use crate::display::{DisplayEntry, DisplayLog, Lane};
use crate::error::ChatError;

pub struct Session {
    catalog: Arc<Catalog>,
    selection: Mutex<SelectionSet>,
    conversation: Mutex<ConversationLog>,
    display: Mutex<DisplayLog>,
    in_flight: AtomicBool,
    events: EventBus,
}

impl Session {
    /// Start a session with an empty selection.
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        events: EventBus,
    ) -> Self {
        let selection = SelectionSet::empty(store, key, events.clone());
        Self::from_parts(catalog, selection, events)
    }

    /// Start a session from the persisted selection.
    pub fn restore(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        events: EventBus,
    ) -> Result<Self, ChatError> {
        let selection = SelectionSet::restore(store, key, events.clone())?;
        Ok(Self::from_parts(catalog, selection, events))
    }

    fn from_parts(catalog: Arc<Catalog>, selection: SelectionSet, events: EventBus) -> Self {
        Self {
            catalog,
            selection: Mutex::new(selection),
            conversation: Mutex::new(ConversationLog::new()),
            display: Mutex::new(DisplayLog::new()),
            in_flight: AtomicBool::new(false),
            events,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn toggle(&self, id: ProductId) -> Result<SelectionChange, ChatError> {
        Ok(lock(&self.selection).toggle(&self.catalog, id)?)
    }

    pub fn remove(&self, id: ProductId) -> Result<(), ChatError> {
        Ok(lock(&self.selection).remove(id)?)
    }

    pub fn clear_selection(&self) -> Result<(), ChatError> {
        Ok(lock(&self.selection).clear()?)
    }

    pub fn is_selected(&self, id: ProductId) -> bool {
        lock(&self.selection).is_selected(id)
    }

    pub fn selected_products(&self) -> Vec<Product> {
        lock(&self.selection).products().to_vec()
    }

    pub fn selection_summaries(&self) -> Vec<ProductSummary> {
        lock(&self.selection).summaries()
    }

    // -------------------------------------------------------------------------
    // Conversation and display
    // -------------------------------------------------------------------------

    /// Snapshot of the conversation history.
    pub fn conversation(&self) -> Vec<Message> {
        lock(&self.conversation).messages().to_vec()
    }

    /// Snapshot of the chat window.
    pub fn display_entries(&self) -> Vec<DisplayEntry> {
        lock(&self.display).entries().to_vec()
    }

    pub(crate) fn chat_payload(&self, persona: &str, input: &Message) -> Vec<Message> {
        lock(&self.conversation).with_turn(persona, input)
    }

    pub(crate) fn record_exchange(&self, user: Message, reply: &str) {
        let len = lock(&self.conversation).append_exchange(user, reply);
        debug!(len, "Conversation appended");
        self.events.publish(SessionEvent::ConversationAppended { len });
    }

    pub(crate) fn show(&self, lane: Lane, text: &str) -> Uuid {
        let id = lock(&self.display).push(lane, text);
        self.events.publish(SessionEvent::DisplayUpdated);
        id
    }

    pub(crate) fn hide(&self, id: Uuid) {
        if lock(&self.display).remove(id) {
            self.events.publish(SessionEvent::DisplayUpdated);
        }
    }

    // -------------------------------------------------------------------------
    // In-flight flag
    // -------------------------------------------------------------------------

    /// Whether a request/response cycle is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the flag, or `None` if another cycle holds it.
    pub(crate) fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: &self.in_flight,
            })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("catalog_len", &self.catalog.len())
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

/// Clears the in-flight flag when dropped.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Session lock poisoned; continuing with inner state");
        poisoned.into_inner()
    })
}
