//! The cache capability consumed by the interceptor.

use super::connection::CacheDb;
use crate::{Error, StoredResponse};

/// Key-value cache storage made of named stores.
///
/// Implementations must make each operation atomic; callers take no locks.
#[async_trait::async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the store if absent.
    async fn open_store(&self, name: &str) -> Result<(), Error>;

    /// Every store name, oldest first.
    async fn store_names(&self) -> Result<Vec<String>, Error>;

    /// Delete a store with all of its entries. Returns false if it didn't exist.
    async fn delete_store(&self, name: &str) -> Result<bool, Error>;

    async fn get(&self, store: &str, key: &str) -> Result<Option<StoredResponse>, Error>;

    async fn put(&self, store: &str, key: &str, response: &StoredResponse) -> Result<(), Error>;

    /// Write every entry or none of them.
    async fn put_all(&self, store: &str, entries: &[(String, StoredResponse)]) -> Result<(), Error>;

    /// Keys held by a store, in insertion order.
    async fn entry_keys(&self, store: &str) -> Result<Vec<String>, Error>;
}

#[async_trait::async_trait]
impl CacheStorage for CacheDb {
    async fn open_store(&self, name: &str) -> Result<(), Error> {
        CacheDb::open_store(self, name).await
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        CacheDb::store_names(self).await
    }

    async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        CacheDb::delete_store(self, name).await
    }

    async fn get(&self, store: &str, key: &str) -> Result<Option<StoredResponse>, Error> {
        self.get_entry(store, key).await
    }

    async fn put(&self, store: &str, key: &str, response: &StoredResponse) -> Result<(), Error> {
        self.put_entry(store, key, response).await
    }

    async fn put_all(&self, store: &str, entries: &[(String, StoredResponse)]) -> Result<(), Error> {
        self.put_entries(store, entries).await
    }

    async fn entry_keys(&self, store: &str) -> Result<Vec<String>, Error> {
        CacheDb::entry_keys(self, store).await
    }
}
