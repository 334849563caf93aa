//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use royal_pipes_core::Config;
use tracing::{info, instrument};

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // stdio is the only transport
}

/// Run the MCP server until the client disconnects.
///
/// The dataset opens on the first tool call that needs it, so the server
/// starts even when the dataset is not there yet.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(_args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let dataset_path = config
        .dataset_path()
        .context("failed to locate the dataset")?;
    info!(dataset = %dataset_path, "starting MCP server on stdio");

    let service = ProjectServer::new(dataset_path, config)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    info!("MCP server stopped");
    Ok(())
}
