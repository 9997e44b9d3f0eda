//! Fetch handler and the three serving strategies.

use precache_core::{Error, StoredResponse};

use super::{FetchEvent, FetchOutcome, Interceptor, ResponseSource, Strategy};
use crate::fetch::InterceptedRequest;

impl Interceptor {
    /// Answer one intercepted request.
    ///
    /// Errors mean the request fails as a network error would; there is no
    /// pass-through case, every request is answered by a strategy.
    pub async fn on_fetch(&self, event: FetchEvent) -> Result<FetchOutcome, Error> {
        let category = self.classify(&event.request);
        let strategy = self.policy.strategy_for(category);
        tracing::debug!(url = %event.request.url, ?category, ?strategy, "routing request");

        let (response, source) = match strategy {
            Strategy::NetworkFirst => self.network_first(event).await?,
            Strategy::CacheFirst => self.cache_first(&event.request).await?,
            Strategy::CacheOrNetwork { offline_fallback } => {
                self.cache_or_network(&event.request, offline_fallback).await?
            }
        };

        Ok(FetchOutcome { response, source, category })
    }

    async fn network_first(&self, event: FetchEvent) -> Result<(StoredResponse, ResponseSource), Error> {
        let FetchEvent { request, preload } = event;

        let live = match preload {
            Some(Ok(response)) => return Ok((response, ResponseSource::Preload)),
            Some(Err(e)) => Err(e),
            None => self.network.fetch(&request).await,
        };

        match live {
            Ok(response) => {
                if request.is_cacheable() && !response.is_partial() {
                    let key = crate::fetch::request_key(&self.config.document_url);
                    if let Err(e) = self.storage.put(&self.config.store_name, &key, &response).await {
                        tracing::warn!("could not store navigation to {}: {e}", request.url);
                    }
                }
                Ok((response, ResponseSource::Network))
            }
            Err(e) => {
                tracing::debug!("navigation to {} failed, trying cache: {e}", request.url);
                if let Some(document) = self.lookup(&self.config.document_url).await? {
                    return Ok((document, ResponseSource::Fallback));
                }
                self.offline_page(e).await
            }
        }
    }

    async fn cache_first(&self, request: &InterceptedRequest) -> Result<(StoredResponse, ResponseSource), Error> {
        if let Some(cached) = self.cached(request).await? {
            return Ok((cached, ResponseSource::Cache));
        }

        let response = self.network.fetch(request).await?;
        if request.is_cacheable() && !response.is_partial() {
            self.put_in_background(request.key(), response.clone()).await;
        }
        Ok((response, ResponseSource::Network))
    }

    async fn cache_or_network(
        &self, request: &InterceptedRequest, offline_fallback: bool,
    ) -> Result<(StoredResponse, ResponseSource), Error> {
        if let Some(cached) = self.cached(request).await? {
            return Ok((cached, ResponseSource::Cache));
        }

        match self.network.fetch(request).await {
            Ok(response) => Ok((response, ResponseSource::Network)),
            Err(e) if offline_fallback => self.offline_page(e).await,
            Err(e) => Err(e),
        }
    }

    async fn cached(&self, request: &InterceptedRequest) -> Result<Option<StoredResponse>, Error> {
        if !request.is_cacheable() {
            return Ok(None);
        }
        let hit = self.storage.get(&self.config.store_name, &request.key()).await?;
        tracing::debug!(url = %request.url, hit = hit.is_some(), "cache lookup");
        Ok(hit)
    }

    async fn offline_page(&self, cause: Error) -> Result<(StoredResponse, ResponseSource), Error> {
        match self.lookup(&self.config.offline_url).await? {
            Some(page) => Ok((page, ResponseSource::Fallback)),
            None => Err(Error::Offline(format!("{cause}; no offline page cached"))),
        }
    }
}
