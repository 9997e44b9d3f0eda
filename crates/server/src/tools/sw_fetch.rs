//! sw_fetch tool implementation.
//!
//! Plays the host's part for one outgoing request: starts a navigation
//! preload when enabled, opens a client for page loads, and dispatches the
//! fetch event to the worker once it is active. Before activation requests
//! go straight to the network.

use precache_client::fetch::is_same_origin;
use precache_client::{FetchEvent, Host, InterceptedRequest, Method, ResponseSource, WorkerState};
use precache_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Input parameters for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute URL, or a path resolved against the configured origin.
    pub url: String,

    /// Treat the request as a full-page navigation.
    #[serde(default)]
    pub navigate: bool,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    /// The URL that was requested.
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    /// Body decoded as UTF-8, lossily.
    pub body: String,
    /// SHA-256 of the raw body.
    pub digest: String,
    /// preload, network, cache or fallback.
    pub source: String,
    /// How the worker classified the request.
    pub category: String,
    /// False when no active worker handled the request.
    pub intercepted: bool,
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(state: &AppState, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let method = Method::from_bytes(params.method.trim().to_uppercase().as_bytes())
        .map_err(|_| Error::InvalidInput(format!("invalid method: {}", params.method)))?;
    let url = state.interceptor.resolve(&params.url)?;
    let request = if params.navigate {
        InterceptedRequest::navigate(url.clone())
    } else {
        InterceptedRequest::get(url.clone())
    }
    .with_method(method);

    let category = state.interceptor.classify(&request);
    let active = state.registration.state().await == WorkerState::Activated;

    if request.is_navigation() {
        state.registration.open_client(url.as_str()).await;
    }

    let (response, source) = if active {
        let mut event = FetchEvent::new(request.clone());
        if request.is_navigation()
            && state.registration.navigation_preload_enabled()
            && is_same_origin(&url, &state.interceptor.config().origin)
        {
            event = event.with_preload(state.network.fetch(&request).await);
        }
        let outcome = state.interceptor.on_fetch(event).await?;
        (outcome.response, outcome.source)
    } else {
        tracing::debug!("no active worker, passing {} through", url);
        (state.network.fetch(&request).await?, ResponseSource::Network)
    };

    let output = SwFetchOutput {
        url: url.to_string(),
        status: response.status,
        status_text: response.status_text.clone(),
        content_type: response.content_type().map(String::from),
        body: response.text(),
        digest: response.digest.clone(),
        headers: response.headers,
        source: label(&source),
        category: label(&category),
        intercepted: active,
    };

    json_result(&output)
}

fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}
