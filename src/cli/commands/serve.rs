//! `serve` command.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::sync::Arc;

use crate::adapters::http::{ApiServer, AppState};
use crate::adapters::sqlite::initialize_from_config;
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let pool = initialize_from_config(&config.database)
        .await
        .with_context(|| format!("Failed to open cache database at {}", config.database.path))?;
    let state = AppState::from_config(&config, pool).context("Failed to assemble API state")?;

    ApiServer::new(Arc::new(state), config.server.clone())
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("HTTP server failed: {e}"))?;

    tracing::info!("advisory API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
