//! SQLite-backed cache stores for response snapshots.
//!
//! This module provides named, versioned cache stores persisted in SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Create-if-absent store opening and wholesale store deletion
//! - Entries keyed by request URL, replaced on every write
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod storage;
pub mod stores;

pub use crate::Error;

pub use connection::CacheDb;
pub use storage::CacheStorage;
pub use stores::StoreInfo;

/// Derive the cache store name for a version.
pub fn store_name(prefix: &str, version: &str) -> String {
    format!("{prefix}-{version}")
}
