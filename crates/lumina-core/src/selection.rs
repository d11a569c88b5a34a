//! The set of products the user has picked for routine generation.
//!
//! The set keeps insertion order, holds at most one record per product id,
//! and writes the full list of records to the key-value store after every
//! mutation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::events::{EventBus, SessionEvent};
use crate::store::KeyValueStore;
use crate::types::{Product, ProductId, ProductSummary};

/// Storage key holding the persisted selection.
pub const SELECTION_KEY: &str = "selectedProducts";

/// Result of a [`SelectionSet::toggle`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// The id is unknown to the catalog; nothing was written.
    Ignored,
}

/// Ordered, id-unique selection backed by durable storage.
pub struct SelectionSet {
    products: Vec<Product>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    events: EventBus,
}

impl SelectionSet {
    /// Start from an empty selection without reading the store.
    pub fn empty(store: Arc<dyn KeyValueStore>, key: impl Into<String>, events: EventBus) -> Self {
        Self {
            products: Vec::new(),
            store,
            key: key.into(),
            events,
        }
    }

    /// Load the persisted selection.
    ///
    /// Entries are taken as stored; they are not checked against the catalog.
    /// A value that does not decode is discarded with a warning.
    pub fn restore(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        events: EventBus,
    ) -> Result<Self> {
        let mut set = Self::empty(store, key, events);
        if let Some(raw) = set.store.get(&set.key)? {
            match decode(&raw) {
                Ok(products) => {
                    debug!(count = products.len(), "Selection restored");
                    set.products = products;
                }
                Err(e) => {
                    warn!(key = %set.key, error = %e, "Discarding unreadable saved selection");
                }
            }
        }
        Ok(set)
    }

    /// Remove the product if selected, otherwise add it from the catalog.
    ///
    /// Ids the catalog does not know are ignored without touching storage,
    /// even when a restored record carries them; use `remove` for those.
    pub fn toggle(&mut self, catalog: &Catalog, id: ProductId) -> Result<SelectionChange> {
        let Some(product) = catalog.get(id) else {
            debug!(product_id = id, "Toggle ignored: unknown product");
            return Ok(SelectionChange::Ignored);
        };
        let change = if self.is_selected(id) {
            self.products.retain(|p| p.id != id);
            SelectionChange::Removed
        } else {
            self.products.push(product.clone());
            SelectionChange::Added
        };
        self.commit()?;
        Ok(change)
    }

    /// Drop the product if present. Persists either way.
    pub fn remove(&mut self, id: ProductId) -> Result<()> {
        self.products.retain(|p| p.id != id);
        self.commit()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.products.clear();
        self.commit()
    }

    pub fn is_selected(&self, id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }

    /// The per-product projection sent with a routine request.
    pub fn summaries(&self) -> Vec<ProductSummary> {
        self.products.iter().map(ProductSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn commit(&self) -> Result<()> {
        let encoded = encode(&self.products)?;
        self.store.set(&self.key, &encoded)?;
        self.events.publish(SessionEvent::SelectionChanged {
            selected: self.ids(),
        });
        Ok(())
    }
}

impl std::fmt::Debug for SelectionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSet")
            .field("key", &self.key)
            .field("ids", &self.ids())
            .finish()
    }
}

/// Serialize a selection to its persisted form.
pub fn encode(products: &[Product]) -> Result<String> {
    Ok(serde_json::to_string(products)?)
}

/// Parse the persisted form back into records.
pub fn decode(raw: &str) -> Result<Vec<Product>> {
    Ok(serde_json::from_str(raw)?)
}
