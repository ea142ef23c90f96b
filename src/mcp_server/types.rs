/*!
# MCP Server Types

Shared error and parameter types for the command surface.
*/

use serde::Deserialize;
use thiserror::Error;

pub type McpResult<T> = Result<T, McpError>;

/// Command-surface failures. Engine-level failures never reach this level
/// as errors; they are serialized into the tool's own structured response.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("no target attached; connect a session first")]
    NotAttached,

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Parameters for `get_tree`. Absent fields fall back to configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTreeParams {
    pub max_depth: Option<usize>,
    pub include_host_elements: Option<bool>,
}

/// Parameters for `inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectParams {
    pub handle: usize,
}

/// Parameters for `search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    pub max_results: Option<usize>,
}

/// Parameters for `mutate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateParams {
    pub handle: usize,
    #[serde(default)]
    pub hook_index: usize,
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutate_params_default_hook_index() {
        let params: MutateParams =
            serde_json::from_value(serde_json::json!({"handle": 3, "value": 7})).unwrap();
        assert_eq!(params.hook_index, 0);
        assert_eq!(params.handle, 3);
    }

    #[test]
    fn tree_params_accept_camel_case() {
        let params: GetTreeParams =
            serde_json::from_value(serde_json::json!({"maxDepth": 2, "includeHostElements": true}))
                .unwrap();
        assert_eq!(params.max_depth, Some(2));
        assert_eq!(params.include_host_elements, Some(true));
    }
}
