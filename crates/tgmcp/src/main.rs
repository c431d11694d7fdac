//! Telegram MCP server.
//!
//! Connects as the configured user account, then serves the tool set as
//! newline-delimited JSON-RPC on stdin/stdout until EOF or Ctrl-C.

use std::sync::Arc;

use tgmcp_core::{config::Config, dispatch::Dispatcher, mcp, tools::ToolName, Error};
use tgmcp_telegram::TelegramConnection;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tgmcp_core::logging::init("tgmcp")?;

    let cfg = Config::load();
    if let Some(path) = &cfg.env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }
    let missing = cfg.missing();
    if !missing.is_empty() {
        tracing::warn!("Missing configuration: {}", missing.join(", "));
    }

    let connection = Arc::new(TelegramConnection::new(&cfg));
    if !connection.connect().await {
        tracing::error!("Failed to connect to Telegram");
        return Err(Error::External("failed to connect to Telegram".to_string()));
    }

    tracing::info!("Telegram MCP server running on stdio");
    tracing::info!(
        "Tools: {}",
        ToolName::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let dispatcher = Dispatcher::new(connection.clone());
    let served = tokio::select! {
        r = mcp::serve(&dispatcher, BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => r,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            Ok(())
        }
    };

    connection.disconnect();
    served
}
