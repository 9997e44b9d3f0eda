//! cache_list tool implementation.
//!
//! Lists every cache store with its entry count.

use precache_core::PolicyName;
use precache_core::cache::StoreInfo;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::tools::json_result;

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    /// Store the worker reads from and writes to.
    pub current: String,
    /// Routing configuration in effect.
    pub policy: PolicyName,
    pub stores: Vec<StoreInfo>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let stores = state.db.list_stores().await?;
    let output = CacheListOutput {
        current: state.interceptor.store_name().to_string(),
        policy: state.config.policy,
        stores,
    };
    json_result(&output)
}
