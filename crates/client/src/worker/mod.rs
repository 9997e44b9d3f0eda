//! Cache-backed request interceptor.
//!
//! The [`Interceptor`] owns one versioned cache store and answers three
//! events dispatched by its driver:
//!
//! - `on_install`: precache every core asset, all or nothing
//! - `on_activate`: enable navigation preload, purge stale stores, claim clients
//! - `on_fetch`: route one request through the [`PolicyTable`]
//!
//! Storage, network and host are injected, so the whole lifecycle runs
//! against in-memory fakes in tests.

mod host;
mod lifecycle;
mod policy;
mod routing;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use precache_core::{AppConfig, CacheStorage, Error, StoredResponse};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use url::Url;

use crate::fetch::{InterceptedRequest, Network, resolve};

pub use host::{ClientInfo, Host, Registration, WorkerState};
pub use lifecycle::{ActivationReport, InstallReport};
pub use policy::{PolicyTable, RequestCategory, Strategy};

/// Everything the interceptor needs to know about the application.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub origin: Url,
    /// The one store valid for this version.
    pub store_name: String,
    pub core_assets: Vec<String>,
    /// Absolute URL every live navigation is stored under.
    pub document_url: Url,
    pub offline_url: Url,
}

impl WorkerConfig {
    pub fn from_app(config: &AppConfig) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
        let document_url =
            resolve(&origin, &config.document_path).map_err(|e| Error::InvalidUrl(format!("document_path: {e}")))?;
        let offline_url =
            resolve(&origin, &config.offline_path).map_err(|e| Error::InvalidUrl(format!("offline_path: {e}")))?;

        Ok(Self {
            origin,
            store_name: config.store_name(),
            core_assets: config.core_assets.clone(),
            document_url,
            offline_url,
        })
    }
}

/// One intercepted request plus whatever the host preloaded for it.
#[derive(Debug)]
pub struct FetchEvent {
    pub request: InterceptedRequest,
    /// Outcome of a navigation preload the host started for this request.
    /// `None` when no preload was initiated.
    pub preload: Option<Result<StoredResponse, Error>>,
}

impl FetchEvent {
    pub fn new(request: InterceptedRequest) -> Self {
        Self { request, preload: None }
    }

    pub fn with_preload(mut self, preload: Result<StoredResponse, Error>) -> Self {
        self.preload = Some(preload);
        self
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Preload,
    Network,
    Cache,
    /// The cached main document or offline page, served after a network failure.
    Fallback,
}

/// The answer to a fetch event.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: StoredResponse,
    pub source: ResponseSource,
    pub category: RequestCategory,
}

/// The request interceptor.
pub struct Interceptor {
    config: WorkerConfig,
    policy: PolicyTable,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    host: Arc<dyn Host>,
    pending: Mutex<JoinSet<()>>,
}

impl Interceptor {
    pub fn new(
        config: WorkerConfig, policy: PolicyTable, storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>,
        host: Arc<dyn Host>,
    ) -> Self {
        Self { config, policy, storage, network, host, pending: Mutex::new(JoinSet::new()) }
    }

    /// Build from application configuration, picking the named policy.
    pub fn from_config(
        config: &AppConfig, storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>, host: Arc<dyn Host>,
    ) -> Result<Self, Error> {
        let worker_config = WorkerConfig::from_app(config)?;
        Ok(Self::new(worker_config, PolicyTable::from_name(config.policy), storage, network, host))
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn store_name(&self) -> &str {
        &self.config.store_name
    }

    /// Classify a request without answering it.
    pub fn classify(&self, request: &InterceptedRequest) -> RequestCategory {
        self.policy.classify(request, &self.config.origin, &self.config.core_assets)
    }

    /// Resolve a path or URL against the application origin.
    pub fn resolve(&self, input: &str) -> Result<Url, Error> {
        resolve(&self.config.origin, input).map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    /// Look up a URL in the current store.
    pub async fn lookup(&self, url: &Url) -> Result<Option<StoredResponse>, Error> {
        self.storage
            .get(&self.config.store_name, &crate::fetch::request_key(url))
            .await
    }

    /// Wait for every background cache write started so far.
    pub async fn settle(&self) {
        let mut tasks = std::mem::take(&mut *self.pending.lock().await);
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!("background cache write did not complete: {e}");
            }
        }
    }

    /// Write a copy into the current store without blocking the caller.
    async fn put_in_background(&self, key: String, response: StoredResponse) {
        let storage = Arc::clone(&self.storage);
        let store = self.config.store_name.clone();
        let mut pending = self.pending.lock().await;
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            if let Err(e) = storage.put(&store, &key, &response).await {
                tracing::warn!("cache write for {key} failed: {e}");
            }
        });
    }
}
