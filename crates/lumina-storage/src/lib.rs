//! Lumina storage crate - SQLite-backed durable key-value store.
//!
//! Provides a WAL-mode SQLite database with versioned migrations and a
//! `KeyValueStore` implementation the selection is persisted through.

pub mod db;
pub mod kv;
pub mod migrations;

pub use db::Database;
pub use kv::SqliteStore;
