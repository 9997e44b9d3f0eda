//! Cache-related MCP tools.
//!
//! Read-only views of the SQLite cache stores. Entries only ever change
//! through the lifecycle and fetch events.

pub mod get;
pub mod list;

pub use get::{CacheGetParams, get_impl};
pub use list::list_impl;
