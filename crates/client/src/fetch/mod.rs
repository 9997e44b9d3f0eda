//! Network fetch primitive.
//!
//! ### Contract
//! - A transport failure (DNS, refused connection, timeout) is an error.
//! - Any HTTP status, including 4xx/5xx, is a response.
//! - The body is read in full so it can be cached as a snapshot.
//!
//! ### Transport
//! - rustls, gzip/brotli/deflate decoding
//! - Max redirects: 5 (configurable)
//! - Timeout: 20s (configurable); the interceptor adds none of its own

pub mod request;
pub mod url;

use precache_core::{AppConfig, Error, StoredResponse};
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use request::{InterceptedRequest, RequestMode};
pub use reqwest::Method;
pub use self::url::{UrlError, is_same_origin, request_key, resolve};

/// The network capability consumed by the interceptor.
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    /// Perform the request and capture the full response.
    async fn fetch(&self, request: &InterceptedRequest) -> Result<StoredResponse, Error>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "precache/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "precache/0.1".to_string(), timeout: Duration::from_millis(20000), max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), max_redirects: config.max_redirects }
    }
}

/// reqwest-backed [`Network`].
pub struct HttpNetwork {
    http: Client,
}

impl HttpNetwork {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &InterceptedRequest) -> Result<StoredResponse, Error> {
        let start = Instant::now();

        let mut builder = self.http.request(request.method.clone(), request.url.clone());
        if request.is_navigation() && !request.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("accept")) {
            builder = builder.header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8");
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("{}: {}", request.url, e)))?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {}", e)))?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} {} -> {} ({}) in {}ms ({} bytes)",
            request.method,
            request.url,
            final_url,
            status.as_u16(),
            fetch_ms,
            bytes.len()
        );

        Ok(StoredResponse::new(
            final_url,
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            headers,
            bytes.to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "precache/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "lectura-sw/3".into(), timeout_ms: 1500, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "lectura-sw/3");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_http_network_new() {
        let network = HttpNetwork::new(FetchConfig::default());
        assert!(network.is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let network = HttpNetwork::new(FetchConfig { timeout: Duration::from_millis(500), ..Default::default() }).unwrap();
        let request = InterceptedRequest::get(reqwest::Url::parse("http://127.0.0.1:9/").unwrap());

        let result = network.fetch(&request).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn test_fetch_real_page() {
        let network = HttpNetwork::new(FetchConfig::default()).unwrap();
        let request = InterceptedRequest::navigate(reqwest::Url::parse("https://example.com").unwrap());

        let response = network.fetch(&request).await.unwrap();
        assert!(response.is_ok());
        assert!(response.text().contains("Example Domain"));
    }
}
