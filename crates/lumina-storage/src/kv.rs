//! SQLite implementation of the key-value store port.

use std::sync::Arc;

use rusqlite::OptionalExtension;
use tracing::debug;

use lumina_core::error::{LuminaError, Result};
use lumina_core::store::KeyValueStore;

use crate::db::Database;

/// Key-value store over the `kv_store` table.
///
/// Each `set` replaces the whole value for the key.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Remove a key. Missing keys are not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])
                .map_err(|e| LuminaError::Storage(format!("Failed to delete {}: {}", key, e)))?;
            Ok(())
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LuminaError::Storage(format!("Failed to read {}: {}", key, e)))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![key, value],
            )
            .map_err(|e| LuminaError::Storage(format!("Failed to write {}: {}", key, e)))?;
            debug!(key, bytes = value.len(), "Stored value");
            Ok(())
        })
    }
}
