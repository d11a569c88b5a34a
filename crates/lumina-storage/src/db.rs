//! SQLite handle for the selection store.
//!
//! One connection behind a mutex. File databases run in WAL mode; both
//! kinds are migrated before they are handed out.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use lumina_core::error::LuminaError;

use crate::migrations;

fn storage_err(context: &str, e: rusqlite::Error) -> LuminaError {
    LuminaError::Storage(format!("{}: {}", context, e))
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database file at `path`, creating it and its directory.
    pub fn new(path: &Path) -> Result<Self, LuminaError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| storage_err("Failed to open database", e))?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
            .map_err(|e| storage_err("Failed to set pragmas", e))?;

        let db = Self::migrated(conn)?;
        info!(path = %path.display(), "Selection database ready");
        Ok(db)
    }

    pub fn in_memory() -> Result<Self, LuminaError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| storage_err("Failed to open in-memory database", e))?;
        Self::migrated(conn)
    }

    fn migrated(conn: Connection) -> Result<Self, LuminaError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` while holding the connection lock.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, LuminaError>
    where
        F: FnOnce(&Connection) -> Result<T, LuminaError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LuminaError::Storage("Database lock poisoned".to_string()))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
