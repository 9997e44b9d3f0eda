//! Shared state behind every tool call.

use std::sync::Arc;

use precache_client::{Interceptor, Network, Registration};
use precache_core::{AppConfig, CacheDb, CacheStorage, Error};

/// The hosted worker and the host-side handles the driver needs.
pub struct AppState {
    pub config: AppConfig,
    pub db: CacheDb,
    pub network: Arc<dyn Network>,
    pub registration: Arc<Registration>,
    pub interceptor: Interceptor,
}

impl AppState {
    pub fn new(config: AppConfig, db: CacheDb, network: Arc<dyn Network>) -> Result<Self, Error> {
        let registration = Arc::new(Registration::default());
        let interceptor = Interceptor::from_config(
            &config,
            Arc::new(db.clone()) as Arc<dyn CacheStorage>,
            Arc::clone(&network),
            registration.clone(),
        )?;

        Ok(Self { config, db, network, registration, interceptor })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};

    use precache_client::InterceptedRequest;
    use precache_core::StoredResponse;

    use super::*;

    pub(crate) const ORIGIN: &str = "https://lectura.app";

    /// Serves a `body of <path>` page for every path, until switched off.
    #[derive(Default)]
    pub(crate) struct StaticNetwork {
        offline: AtomicBool,
    }

    impl StaticNetwork {
        pub(crate) fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl Network for StaticNetwork {
        async fn fetch(&self, request: &InterceptedRequest) -> Result<StoredResponse, Error> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(Error::Network("connection refused".into()));
            }
            let path = request.url.path();
            let content_type = if path.ends_with(".css") { "text/css" } else { "text/html" };
            let headers = vec![("content-type".to_string(), content_type.to_string())];
            let body = format!("body of {path}");
            Ok(StoredResponse::new(request.key(), 200, "OK", headers, body.into_bytes()))
        }
    }

    pub(crate) async fn state_with(network: Arc<StaticNetwork>) -> AppState {
        let config = AppConfig { origin: ORIGIN.into(), ..Default::default() };
        let db = CacheDb::open_in_memory().await.unwrap();
        AppState::new(config, db, network).unwrap()
    }
}
