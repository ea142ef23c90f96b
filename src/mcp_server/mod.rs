/*!
# MCP Server

Command surface for the engine: a session object holding the attached
target, the seven operations exposed as MCP tools, and a JSON-RPC 2.0
stdio transport.
*/

mod inspector;
pub mod rpc;
pub mod tools;
mod types;

pub use inspector::FiberInspector;
pub use tools::{InspectResult, ProfileResult, SearchResult, TreeResult};
pub use types::{
    GetTreeParams, InspectParams, McpError, McpResult, MutateParams, SearchParams,
};
