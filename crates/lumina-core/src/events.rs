use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ExchangeMode, ProductId};

/// Events emitted by a session after its state changes.
///
/// Renderers subscribe to these to know when to redraw the selection panel
/// or the chat window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SessionEvent {
    /// The selection was mutated and persisted.
    SelectionChanged { selected: Vec<ProductId> },

    /// A request/response cycle began.
    ExchangeStarted { mode: ExchangeMode },

    /// A request/response cycle ended.
    ExchangeFinished { mode: ExchangeMode, succeeded: bool },

    /// A user/assistant pair was appended to the conversation log.
    ConversationAppended { len: usize },

    /// The chat window gained, lost, or changed an entry.
    DisplayUpdated,
}

/// Fan-out channel for [`SessionEvent`]s.
///
/// Publishing never fails: with no subscribers the event is dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        bus.publish(SessionEvent::DisplayUpdated);
    }

    #[test]
    fn test_subscriber_receives_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(SessionEvent::ExchangeStarted {
            mode: ExchangeMode::Chat,
        });
        bus.publish(SessionEvent::ExchangeFinished {
            mode: ExchangeMode::Chat,
            succeeded: false,
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::ExchangeStarted {
                mode: ExchangeMode::Chat
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::ExchangeFinished {
                mode: ExchangeMode::Chat,
                succeeded: false
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_serialization() {
        let event = SessionEvent::SelectionChanged {
            selected: vec![3, 1],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("SelectionChanged"));
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
