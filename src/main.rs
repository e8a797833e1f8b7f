use anyhow::Context;
use interlink_mcp::{Config, LinkServer};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the MCP protocol
    interlink_mcp::tracing::init();

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(
        "Starting interlink-mcp (semantic: {}, max results: {}, mode: {})",
        config.semantic,
        config.max_results,
        config.default_mode
    );

    let server = LinkServer::new(&config);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
