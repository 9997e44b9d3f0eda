//! sw_install and sw_activate tool implementations.
//!
//! Each call dispatches one lifecycle event and waits for it to finish, so
//! the caller controls when the worker moves to the next phase.

use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::json_result;
use crate::state::AppState;

/// Implementation of the sw_install tool.
pub async fn install_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let report = state.interceptor.on_install().await?;
    json_result(&report)
}

/// Implementation of the sw_activate tool.
pub async fn activate_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let report = state.interceptor.on_activate().await?;
    json_result(&report)
}
