/*!
# JSON-RPC Transport

A plain JSON-RPC 2.0 loop over stdio, implemented without an external MCP
SDK (the protocol surface needed here is three methods). Logging goes to
stderr so stdout stays a clean protocol channel.
*/

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::mcp_server::inspector::FiberInspector;
use crate::mcp_server::tools;
use crate::mcp_server::types::McpError;

pub const PROTOCOL_VERSION: &str = "0.1.0";
pub const SERVER_NAME: &str = "Fiber Inspector";

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Option<Value>,
    id: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

fn success(result: Value, id: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: Some(result),
        error: None,
        id,
    }
}

fn failure(code: i32, message: String, id: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(JsonRpcError { code, message }),
        id,
    }
}

/// Wraps a tool's JSON payload in the MCP text-content envelope.
fn tool_content(payload: String, id: Value) -> JsonRpcResponse {
    success(
        json!({
            "content": [{
                "type": "text",
                "text": payload
            }]
        }),
        id,
    )
}

/// Declared schemas for `tools/list`.
pub fn tool_descriptors() -> Value {
    json!([
        {
            "name": "detect",
            "description": "Probe the attached page for the framework, its version and root count",
            "inputSchema": {"type": "object", "properties": {}}
        },
        {
            "name": "get_tree",
            "description": "Walk the component tree into a filtered summary forest",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "maxDepth": {"type": "integer", "description": "Maximum component depth (default 20)"},
                    "includeHostElements": {"type": "boolean", "description": "Also show host (DOM) elements (default false)"}
                }
            }
        },
        {
            "name": "inspect",
            "description": "Deep-inspect one component by handle: props, state, hooks, links",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "handle": {"type": "integer", "description": "Handle from a previous get_tree or search call"}
                },
                "required": ["handle"]
            }
        },
        {
            "name": "search",
            "description": "Find components whose display name contains a substring",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "maxResults": {"type": "integer", "description": "Result budget (default 20)"}
                },
                "required": ["query"]
            }
        },
        {
            "name": "mutate",
            "description": "Push a new value into a component's state hook or class state",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "handle": {"type": "integer"},
                    "hookIndex": {"type": "integer", "description": "Hook chain index (default 0)"},
                    "value": {"description": "New value, any JSON shape"}
                },
                "required": ["handle", "value"]
            }
        },
        {
            "name": "start_profiler",
            "description": "Install the commit shim and start counting re-renders",
            "inputSchema": {"type": "object", "properties": {}}
        },
        {
            "name": "stop_profiler",
            "description": "Remove the commit shim and report render counts and durations",
            "inputSchema": {"type": "object", "properties": {}}
        }
    ])
}

fn parse_params<T: serde::de::DeserializeOwned>(args: &Value) -> Result<T, McpError> {
    serde_json::from_value(args.clone()).map_err(|error| McpError::InvalidParams(error.to_string()))
}

async fn call_tool(
    inspector: &FiberInspector,
    name: &str,
    args: &Value,
) -> Result<String, McpError> {
    match name {
        "detect" => Ok(tools::detect_impl(inspector).await),
        "get_tree" => Ok(tools::get_tree_impl(inspector, parse_params(args)?).await),
        "inspect" => Ok(tools::inspect_impl(inspector, parse_params(args)?).await),
        "search" => Ok(tools::search_impl(inspector, parse_params(args)?).await),
        "mutate" => Ok(tools::mutate_impl(inspector, parse_params(args)?).await),
        "start_profiler" => Ok(tools::start_profiler_impl(inspector).await),
        "stop_profiler" => Ok(tools::stop_profiler_impl(inspector).await),
        other => Err(McpError::UnknownTool(other.to_string())),
    }
}

async fn handle_request(inspector: &FiberInspector, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return failure(
            -32600,
            format!("unsupported jsonrpc version: {}", request.jsonrpc),
            request.id,
        );
    }

    match request.method.as_str() {
        "initialize" => success(
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {"tools": true}
            }),
            request.id,
        ),
        "tools/list" => success(json!({"tools": tool_descriptors()}), request.id),
        "tools/call" => {
            let params = request.params.unwrap_or_else(|| json!({}));
            let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let empty_args = json!({});
            let args = params.get("arguments").unwrap_or(&empty_args);
            debug!(tool = name, "tools/call");

            match call_tool(inspector, name, args).await {
                Ok(payload) => tool_content(payload, request.id),
                Err(McpError::UnknownTool(tool)) => {
                    failure(-32601, format!("Unknown tool: {}", tool), request.id)
                }
                Err(error) => failure(-32602, error.to_string(), request.id),
            }
        }
        other => failure(-32601, format!("Method not found: {}", other), request.id),
    }
}

/// Runs the stdio loop until EOF.
pub async fn run_stdio(inspector: FiberInspector) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break; // EOF
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(request) => handle_request(&inspector, request).await,
            Err(error) => {
                warn!(%error, "unparseable request");
                failure(-32700, "Parse error".to_string(), Value::Null)
            }
        };

        let payload = serde_json::to_string(&response)?;
        stdout.write_all(payload.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
