/*!
# Fiber Inspector CLI

Command-line interface for the live component-graph inspector.
*/

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fiber_inspector::demo::sample_target;
use fiber_inspector::engine::{format_forest, InspectionEngine, SearchOptions, WalkOptions};
use fiber_inspector::mcp_server::{rpc, FiberInspector};
use fiber_inspector::InspectorConfig;

#[derive(Parser)]
#[command(
    name = "fiber-inspector",
    version = env!("CARGO_PKG_VERSION"),
    author = "Fiber Inspector Team",
    about = "Live React fiber-tree introspection and mutation engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server over stdio
    Serve {
        /// Attach the built-in demo application instead of waiting for a
        /// transport-provided target
        #[arg(long)]
        demo: bool,
    },

    /// Walk, inspect and profile the built-in demo application
    Demo {
        /// Maximum component depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Also show host (DOM) elements
        #[arg(long)]
        include_host: bool,
    },

    /// Show server name, version and tool list
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve { demo } => serve(demo).await,
        Commands::Demo {
            max_depth,
            include_host,
        } => run_demo(max_depth, include_host),
        Commands::Info => info_command(),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn serve(demo: bool) -> Result<()> {
    let inspector = FiberInspector::new();
    if demo {
        inspector.attach(sample_target().target).await;
        info!("serving with the built-in demo target attached");
    } else {
        info!("serving with no target attached; tools report hookAvailable=false until attach");
    }
    eprintln!("{} listening on stdio", style(rpc::SERVER_NAME).green());
    rpc::run_stdio(inspector).await
}

fn run_demo(max_depth: Option<usize>, include_host: bool) -> Result<()> {
    let config = InspectorConfig::global();
    let demo = sample_target();
    let hook = demo.target.hook.as_ref();
    let mut engine = InspectionEngine::new();

    println!("{}", style("== detect ==").cyan().bold());
    let report = engine.detect(&demo.target.page, hook);
    println!("{}", serde_json::to_string_pretty(&report)?);

    println!("\n{}", style("== component tree ==").cyan().bold());
    let options = WalkOptions {
        max_depth: max_depth.unwrap_or(config.max_depth),
        include_host_elements: include_host || config.include_host_elements,
    };
    let forest = engine.get_tree(hook, &options);
    print!("{}", format_forest(&forest));

    println!("{}", style("== inspect App ==").cyan().bold());
    if let Some(details) = forest.first().and_then(|app| engine.inspect(hook, app.handle)) {
        println!("{}", serde_json::to_string_pretty(&details)?);
    }

    println!("\n{}", style("== search \"todo\" ==").cyan().bold());
    let hits = engine.search(
        hook,
        "todo",
        &SearchOptions {
            max_results: config.max_results,
        },
    );
    for hit in &hits {
        println!(
            "[{}] {} ({}) under {}",
            hit.handle,
            style(&hit.display_name).yellow(),
            hit.kind,
            hit.parent_display_name.as_deref().unwrap_or("-")
        );
    }

    println!("\n{}", style("== profiler: three commits ==").cyan().bold());
    // The profiler borrows the hook mutably to swap the commit callback,
    // so take the target apart for this phase.
    let mut target = demo.target;
    if let Some(hook) = target.hook.as_mut() {
        engine.start_profiler(hook);
        for _ in 0..3 {
            hook.emit_commit(demo.root);
        }
        let entries = engine.stop_profiler(hook);
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }

    Ok(())
}

fn info_command() -> Result<()> {
    println!(
        "{} v{}",
        style(rpc::SERVER_NAME).green().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("protocol version: {}", rpc::PROTOCOL_VERSION);
    println!("\ntools:");
    for tool in rpc::tool_descriptors().as_array().into_iter().flatten() {
        println!(
            "  {:<16} {}",
            style(tool["name"].as_str().unwrap_or("?")).yellow(),
            tool["description"].as_str().unwrap_or("")
        );
    }
    Ok(())
}
