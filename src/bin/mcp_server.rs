/// Standalone MCP server for the fiber inspector.
///
/// Implemented over a plain JSON-RPC 2.0 stdio protocol; see
/// `mcp_server::rpc` for the loop. Set `FIBER_INSPECTOR_DEMO=1` to serve
/// against the built-in demo application.
///
/// To run: cargo run --bin fiber-mcp-server
use anyhow::Result;
use tracing_subscriber::EnvFilter;

use fiber_inspector::demo::sample_target;
use fiber_inspector::mcp_server::{rpc, FiberInspector};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging to stderr keeps stdout a clean protocol channel.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    eprintln!("Starting {} MCP server...", rpc::SERVER_NAME);

    let inspector = FiberInspector::new();
    if std::env::var("FIBER_INSPECTOR_DEMO").is_ok() {
        inspector.attach(sample_target().target).await;
        eprintln!("Demo target attached");
    }

    eprintln!("Waiting for JSON-RPC requests on stdin...");
    rpc::run_stdio(inspector).await
}
