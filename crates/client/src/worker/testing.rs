//! In-memory network and fixtures shared by the worker tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use precache_core::{AppConfig, CacheDb, CacheStorage, Error, StoredResponse};
use tokio::sync::RwLock;

use super::{Interceptor, PolicyTable, Registration, WorkerConfig};
use crate::fetch::{InterceptedRequest, Network};

pub(crate) const ORIGIN: &str = "https://lectura.app";

pub(crate) fn page(url: &str, body: &str) -> StoredResponse {
    StoredResponse::new(url, 200, "OK", vec![("content-type".into(), "text/html".into())], body.as_bytes().to_vec())
}

pub(crate) fn partial(url: &str, body: &str) -> StoredResponse {
    StoredResponse::new(url, 206, "Partial Content", Vec::new(), body.as_bytes().to_vec())
}

/// Every default core asset plus one API route.
pub(crate) fn site() -> HashMap<String, StoredResponse> {
    AppConfig::default()
        .core_assets
        .iter()
        .map(String::as_str)
        .chain(["/api/books"])
        .map(|path| {
            let url = format!("{ORIGIN}{path}");
            let body = format!("body of {path}");
            (url.clone(), page(&url, &body))
        })
        .collect()
}

/// A network that answers from a map and can be switched off.
///
/// Unknown URLs get a 404 response, like a real server would return.
pub(crate) struct FakeNetwork {
    pages: RwLock<HashMap<String, StoredResponse>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl FakeNetwork {
    pub(crate) fn serving(pages: HashMap<String, StoredResponse>) -> Self {
        Self { pages: RwLock::new(pages), offline: AtomicBool::new(false), calls: AtomicUsize::new(0) }
    }

    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub(crate) fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn set(&self, url: &str, body: &str) {
        self.respond(url, page(url, body)).await;
    }

    pub(crate) async fn respond(&self, url: &str, response: StoredResponse) {
        self.pages.write().await.insert(url.to_string(), response);
    }
}

/// Storage whose reads work but every write fails.
pub(crate) struct ReadOnlyStorage(pub(crate) CacheDb);

#[async_trait::async_trait]
impl CacheStorage for ReadOnlyStorage {
    async fn open_store(&self, name: &str) -> Result<(), Error> {
        self.0.open_store(name).await
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.0.store_names().await
    }

    async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        self.0.delete_store(name).await
    }

    async fn get(&self, store: &str, key: &str) -> Result<Option<StoredResponse>, Error> {
        self.0.get_entry(store, key).await
    }

    async fn put(&self, _store: &str, key: &str, _response: &StoredResponse) -> Result<(), Error> {
        Err(Error::Connection(format!("attempt to write a readonly database ({key})")))
    }

    async fn put_all(&self, _store: &str, _entries: &[(String, StoredResponse)]) -> Result<(), Error> {
        Err(Error::Connection("attempt to write a readonly database".into()))
    }

    async fn entry_keys(&self, store: &str) -> Result<Vec<String>, Error> {
        self.0.entry_keys(store).await
    }
}

#[async_trait::async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &InterceptedRequest) -> Result<StoredResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{}: connection refused", request.url)));
        }

        let key = request.key();
        Ok(self
            .pages
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_else(|| StoredResponse::new(key, 404, "Not Found", Vec::new(), Vec::new())))
    }
}

pub(crate) fn worker_config() -> WorkerConfig {
    WorkerConfig::from_app(&AppConfig { origin: ORIGIN.into(), ..Default::default() }).unwrap()
}

pub(crate) async fn interceptor_with(
    policy: PolicyTable, network: Arc<FakeNetwork>,
) -> (Interceptor, CacheDb, Arc<Registration>) {
    let db = CacheDb::open_in_memory().await.unwrap();
    let host = Arc::new(Registration::default());
    let worker = Interceptor::new(
        worker_config(),
        policy,
        Arc::new(db.clone()) as Arc<dyn CacheStorage>,
        network,
        host.clone(),
    );
    (worker, db, host)
}
