//! Requests seen by the interceptor.

use reqwest::Method;
use url::Url;

use super::url::request_key;

/// How the request was initiated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMode {
    /// A full-page load.
    Navigate,
    /// Anything a page asks for: scripts, styles, images, XHR.
    #[default]
    Subresource,
}

/// An outgoing request intercepted before it reaches the network.
#[derive(Debug, Clone)]
pub struct InterceptedRequest {
    pub url: Url,
    pub method: Method,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
}

impl InterceptedRequest {
    /// A plain subresource GET.
    pub fn get(url: Url) -> Self {
        Self { url, method: Method::GET, mode: RequestMode::Subresource, headers: Vec::new() }
    }

    /// A page navigation.
    pub fn navigate(url: Url) -> Self {
        Self { mode: RequestMode::Navigate, ..Self::get(url) }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Only GET requests are read from or written to a cache store.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::GET
    }

    /// Cache key for this request; method and headers are ignored.
    pub fn key(&self) -> String {
        request_key(&self.url)
    }
}
