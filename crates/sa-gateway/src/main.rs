//! sa-gateway: Stock Assistant Gateway Main Binary
//!
//! Usage:
//!   sa-gateway           - Start the HTTP API server
//!   sa-gateway --help    - Show help
//!   sa-gateway --version - Show version

use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use sa_core::{Config, LlmClient, SessionManager, StockAgent, ToolManager, TurnOrchestrator};
use sa_tools::{register_stock_tools, TickerDataset};

/// Run mode
enum RunMode {
    /// HTTP API server
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("sa-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting sa-gateway...");
    tracing::info!("Model: {}", config.llm.model);

    run_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("sa-gateway - Stock Assistant Gateway");
    println!();
    println!("Usage:");
    println!("  sa-gateway           Start the HTTP API server");
    println!("  sa-gateway --help    Show this help message");
    println!("  sa-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  LLM_API_KEY          API key (required)");
    println!("  LLM_MODEL            Model name (default: claude-sonnet-4-20250514)");
    println!("  LLM_PROVIDER         Provider: claude or openai (default: claude)");
    println!("  LLM_BASE_URL         Custom API endpoint");
    println!("  API_PORT             HTTP API port (default: 3000)");
    println!("  DB_PATH              SQLite database path (default: data/sa-gateway.db)");
    println!("  SESSION_TTL_SECS     Session TTL in seconds (default: 86400)");
    println!("  CONTEXT_WINDOW       Messages per agent context (default: 20)");
    println!("  DATASET_PATH         Ticker dataset path (default: data/tickers.json)");
}

/// Run the HTTP API server
async fn run_server(config: Config) -> anyhow::Result<()> {
    // Load the ticker dataset
    let dataset = TickerDataset::from_json_file(&config.dataset.path)
        .map_err(|e| anyhow::anyhow!("Failed to load ticker dataset: {}", e))?;
    let dataset = Arc::new(dataset);

    // Register the stock tools
    let mut tool_manager = ToolManager::new();
    register_stock_tools(&mut tool_manager, Arc::clone(&dataset));
    tracing::info!(
        "Registered {} tools: {:?}",
        tool_manager.len(),
        tool_manager.tool_names()
    );

    // Create the LLM client and agent
    let client =
        LlmClient::new(&config).map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
    let agent = Arc::new(StockAgent::new(client, Arc::new(tool_manager)));

    // Create the session manager
    if let Some(parent) = Path::new(&config.store.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let sessions = Arc::new(
        SessionManager::new(&config.store.db_path, config.store.ttl_secs)
            .map_err(|e| anyhow::anyhow!("Failed to create session manager: {}", e))?,
    );

    // Wire the orchestrator
    let orchestrator = Arc::new(
        TurnOrchestrator::new(Arc::clone(&sessions), agent)
            .with_context_window(config.store.context_window),
    );

    // Start the HTTP API server
    let api_port = config.api.port;
    let server_sessions = Arc::clone(&sessions);
    let handle = tokio::spawn(async move {
        if let Err(e) = sa_api::start_server(api_port, orchestrator, server_sessions).await {
            tracing::error!("HTTP API error: {}", e);
        }
    });
    tracing::info!("HTTP API server started on port {}", api_port);

    tracing::info!("sa-gateway initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    handle.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
