//! EA-Bridge - stdio JSON-RPC tool server
//!
//! Entry point: parses the CLI, initializes tracing on stderr, builds
//! the server context, and runs the stdio transport until EOF or an
//! interrupt signal.

use clap::Parser;
use ea_bridge::{AgentRegistry, McpServer, Result, ServerConfig, StateStore, ToolHandler};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ea-bridge")]
#[command(about = "Stdio JSON-RPC tool server for the EA assistant bridge")]
#[command(version)]
struct Cli {
    /// Display timezone for time-block output (IANA name)
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "ea_bridge={}",
        level.as_str().to_lowercase()
    ));

    // Logs go to stderr: stdout carries only JSON-RPC responses.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("EA-Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::with_timezone(&cli.timezone)?;
    debug!("Display timezone: {}", config.display_timezone.name());

    let tool_handler = ToolHandler::new(config.clone(), AgentRegistry::new(), StateStore::new());
    let mut server = McpServer::new(config, tool_handler);

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping server gracefully...");
        }
    }

    Ok(())
}
