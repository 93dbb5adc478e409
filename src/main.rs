//! Scout CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scout::cli::{run_interactive, Cli};
use scout::config::ScoutConfig;
use scout::error::ScoutError;
use scout::mcp::{ToolServerAdapter, ToolServerClient};
use scout::reasoning::ToolLoopReasoner;
use scout::session::{Session, TraceEvent, TraceSink};
use scout::tools::dynamic::collect_tools;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "scout=debug" } else { "scout=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ScoutError> {
    let mut config = ScoutConfig::from_env();
    if let Some(url) = cli.server_url.clone() {
        config.set_server_url(url);
    }

    // Credentials are checked before any connection attempt.
    let provider = scout::provider::create_provider(&config)?;

    let client = Arc::new(ToolServerClient::connect(config.server_url()).await?);
    let tools = collect_tools(Arc::new(ToolServerAdapter::new(client))).await?;

    let tool_names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    eprintln!("Connected to MCP server at {}", config.server_url());
    eprintln!("Loaded {} tools: {:?}", tools.len(), tool_names);

    let reasoner = Arc::new(ToolLoopReasoner::new(provider, tools));
    let session = Session::new(reasoner).with_trace_sink(stderr_trace_sink());

    match cli.query_text() {
        Some(query) => {
            let answer = session.answer(&query).await?;
            println!("{answer}");
        }
        None => run_interactive(&session).await?,
    }

    Ok(())
}

fn stderr_trace_sink() -> TraceSink {
    Arc::new(|event: &TraceEvent| match event {
        TraceEvent::ToolCall { name, args_summary } => {
            eprintln!("⚡ {name} {args_summary}");
        }
        TraceEvent::ToolResult { name, preview } => {
            eprintln!("  ✅ {name}: {preview}");
        }
    })
}
