//! Product catalog.
//!
//! The catalog is the read-only list of products for a session. It is read
//! from a JSON document of the form `{"products": [...]}` the first time
//! anything asks for it and never reloaded afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::info;

use crate::error::{LuminaError, Result};
use crate::types::{Product, ProductId};

#[derive(Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

/// Immutable product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from product records, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(LuminaError::Catalog(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parse a `{"products": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::new(doc.products)
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            products = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Products whose category matches exactly.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Lazily loaded, load-once holder for the session catalog.
#[derive(Debug)]
pub struct CatalogStore {
    source: PathBuf,
    catalog: OnceLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            catalog: OnceLock::new(),
        }
    }

    /// Wrap an already-built catalog (no file is read).
    pub fn preloaded(catalog: Catalog) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Arc::new(catalog));
        Self {
            source: PathBuf::new(),
            catalog: cell,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    /// Return the catalog, reading the source file on first use.
    ///
    /// A failed read leaves the store unloaded so a later call can retry.
    pub fn get(&self) -> Result<Arc<Catalog>> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(Arc::clone(catalog));
        }
        let loaded = Arc::new(Catalog::load(&self.source)?);
        Ok(Arc::clone(self.catalog.get_or_init(|| loaded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
  "products": [
    {"id": 1, "name": "Cleanser", "brand": "CeraVe", "category": "cleanser",
     "description": "Foaming cleanser.", "image": "https://img/1.png"},
    {"id": 2, "name": "Moisturizer", "brand": "CeraVe", "category": "moisturizer",
     "description": "Daily lotion.", "image": "https://img/2.png"},
    {"id": 3, "name": "Micellar Water", "brand": "Garnier", "category": "cleanser",
     "description": "No-rinse cleanser.", "image": "https://img/3.png"}
  ]
}"#;

    #[test]
    fn test_from_json_and_lookup() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).unwrap().name, "Moisturizer");
        assert!(catalog.get(99).is_none());
        assert!(catalog.contains(3));
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.categories(), vec!["cleanser", "moisturizer"]);
    }

    #[test]
    fn test_by_category_filters_exactly() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<ProductId> = catalog.by_category("cleanser").map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(catalog.by_category("Cleanser").count(), 0);
        assert_eq!(catalog.by_category("fragrance").count(), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"products": [
            {"id": 1, "name": "a", "brand": "b", "category": "c", "description": "d", "image": "e"},
            {"id": 1, "name": "a", "brand": "b", "category": "c", "description": "d", "image": "e"}
        ]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, LuminaError::Catalog(_)));
    }

    #[test]
    fn test_missing_products_key_is_serialization_error() {
        let err = Catalog::from_json(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, LuminaError::Serialization(_)));
    }

    #[test]
    fn test_store_loads_once() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let store = CatalogStore::new(file.path());
        assert!(!store.is_loaded());
        let first = store.get().unwrap();
        assert!(store.is_loaded());

        // Later edits to the file are not picked up.
        std::fs::write(file.path(), r#"{"products": []}"#).unwrap();
        let second = store.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_store_missing_file_can_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let store = CatalogStore::new(&path);

        assert!(matches!(store.get().unwrap_err(), LuminaError::Io(_)));
        assert!(!store.is_loaded());

        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(store.get().unwrap().len(), 3);
    }

    #[test]
    fn test_preloaded_store() {
        let store = CatalogStore::preloaded(Catalog::from_json(SAMPLE).unwrap());
        assert!(store.is_loaded());
        assert_eq!(store.get().unwrap().categories().len(), 2);
    }
}
