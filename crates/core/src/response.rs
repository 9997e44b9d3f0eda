//! Response snapshots.
//!
//! A [`StoredResponse`] is both what the network hands back and what a cache
//! store keeps: status, headers and the full body, taken at one point in time.

use serde::{Deserialize, Serialize};

use crate::cache::hash::body_digest;

/// A response captured in full, ready to be returned or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StoredResponse {
    /// URL the response was produced for (after redirects).
    pub url: String,
    pub status: u16,
    pub status_text: String,
    /// Header name/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Hex SHA-256 of `body`.
    pub digest: String,
    /// RFC 3339 timestamp of when the body was received.
    pub fetched_at: String,
}

impl StoredResponse {
    /// Capture a response, computing its digest and timestamp.
    pub fn new(
        url: impl Into<String>, status: u16, status_text: impl Into<String>, headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Self {
        let digest = body_digest(&body);
        Self {
            url: url.into(),
            status,
            status_text: status_text.into(),
            headers,
            body,
            digest,
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Partial responses cannot be cached.
    pub fn is_partial(&self) -> bool {
        self.status == 206
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_digest() {
        let res = StoredResponse::new("https://example.com/", 200, "OK", Vec::new(), b"hello".to_vec());
        assert_eq!(res.digest, body_digest(b"hello"));
        assert!(!res.fetched_at.is_empty());
    }

    #[test]
    fn test_status_predicates() {
        let ok = StoredResponse::new("https://example.com/", 204, "No Content", Vec::new(), Vec::new());
        assert!(ok.is_ok());

        let missing = StoredResponse::new("https://example.com/", 404, "Not Found", Vec::new(), Vec::new());
        assert!(!missing.is_ok());

        let partial = StoredResponse::new("https://example.com/", 206, "Partial Content", Vec::new(), Vec::new());
        assert!(partial.is_ok());
        assert!(partial.is_partial());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let res = StoredResponse::new(
            "https://example.com/style.css",
            200,
            "OK",
            vec![("Content-Type".into(), "text/css".into())],
            Vec::new(),
        );
        assert_eq!(res.content_type(), Some("text/css"));
        assert_eq!(res.header("etag"), None);
    }
}
