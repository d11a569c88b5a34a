//! Core types for Lumina: products and the catalog, the persisted
//! selection, chat messages, configuration, and session events.

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod selection;
pub mod store;
pub mod types;

pub use catalog::{Catalog, CatalogStore};
pub use config::LuminaConfig;
pub use error::{LuminaError, Result};
pub use events::{EventBus, SessionEvent};
pub use selection::{SelectionChange, SelectionSet, SELECTION_KEY};
pub use store::{KeyValueStore, MemoryStore};
pub use types::*;
