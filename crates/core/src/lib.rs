//! Core types and shared functionality for precache.
//!
//! This crate provides:
//! - Versioned cache stores with a SQLite backend
//! - Response snapshots stored in those caches
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod response;

pub use cache::{CacheDb, CacheStorage, store_name};
pub use config::{AppConfig, ConfigError, PolicyName};
pub use error::Error;
pub use response::StoredResponse;
