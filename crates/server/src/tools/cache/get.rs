//! cache_get tool implementation.
//!
//! Retrieves one stored response by URL.

use precache_core::{Error, StoredResponse};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Absolute URL, or a path resolved against the configured origin.
    pub url: String,

    /// Store to look in (default: the current store).
    #[serde(default)]
    pub store: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub store: String,
    pub key: String,
    pub entry: StoredResponse,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(state: &AppState, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let url = state.interceptor.resolve(&params.url)?;
    let key = precache_client::fetch::request_key(&url);
    let store = params
        .store
        .unwrap_or_else(|| state.interceptor.store_name().to_string());

    let entry = state
        .db
        .get_entry(&store, &key)
        .await?
        .ok_or_else(|| Error::CacheMiss(format!("{key} in {store}")))?;

    json_result(&CacheGetOutput { store, key, entry })
}
