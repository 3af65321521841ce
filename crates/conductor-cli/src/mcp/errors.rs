//! Error handling utilities for MCP server

use conductor_core::EngineError;
use rmcp::ErrorData;

/// Converts an engine error into an MCP error.
///
/// Errors caused by the caller's arguments become `invalid_params`; anything
/// else is reported as an internal error.
pub fn to_mcp_error(message: &str, error: &EngineError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error.code() {
        "not_found" | "conflict" | "invalid_request" => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}
