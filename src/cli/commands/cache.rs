//! `cache` commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::time::Duration;

use crate::adapters::sqlite::{initialize_from_config, SqliteResponseCache};
use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::{Config, EndpointCacheStats};

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show entry counts per endpoint
    Stats {
        /// Age limit for live entries (defaults to cache.default_ttl_secs)
        #[arg(long)]
        max_age_secs: Option<u64>,
    },
}

#[derive(Debug, Serialize)]
pub struct CacheStatsOutput {
    pub max_age_secs: u64,
    pub endpoints: Vec<EndpointCacheStats>,
}

impl CommandOutput for CacheStatsOutput {
    fn to_human(&self) -> String {
        if self.endpoints.is_empty() {
            return "No cached responses found.".to_string();
        }

        let mut table = list_table(&["endpoint", "entries", "live"]);
        for stats in &self.endpoints {
            table.add_row(vec![
                stats.endpoint.clone(),
                stats.total_entries.to_string(),
                stats.live_entries.to_string(),
            ]);
        }
        format!("Response cache (live = younger than {}s):\n{table}", self.max_age_secs)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CacheArgs, config: Config, json: bool) -> Result<()> {
    match args.command {
        CacheCommands::Stats { max_age_secs } => {
            let max_age_secs = max_age_secs.unwrap_or(config.cache.default_ttl_secs);
            let pool = initialize_from_config(&config.database)
                .await
                .with_context(|| format!("Failed to open cache database at {}", config.database.path))?;

            let endpoints = SqliteResponseCache::new(pool)
                .stats(Duration::from_secs(max_age_secs))
                .await
                .context("Failed to read cache statistics")?;

            output(&CacheStatsOutput { max_age_secs, endpoints }, json);
        }
    }
    Ok(())
}
