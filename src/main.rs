mod cli;
mod logging;

use std::sync::Arc;

use clap::Parser;
use inventory_mcp::{AwsProvider, InventoryServer};
use rmcp::{transport::stdio, ServiceExt};
use tracing::{error, info};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json)?;

    let config = cli.resolve_config().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;
    info!(
        region = %config.aws.region,
        profile = ?config.aws.profile,
        max_concurrency = config.enrichment.max_concurrency,
        sub_call_timeout_ms = ?config.enrichment.sub_call_timeout_ms,
        include_warnings = config.diagnostics.include_warnings,
        "Starting AWS inventory MCP server"
    );

    let provider = AwsProvider::from_config(&config.aws).await;
    let server = InventoryServer::from_provider(Arc::new(provider), &config);

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!(error = %e, "Failed to start stdio server");
    })?;
    let reason = service.waiting().await?;
    info!(reason = ?reason, "Server stopped");

    Ok(())
}
