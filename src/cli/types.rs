//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::cache::CacheArgs;
use super::commands::fingerprint::FingerprintArgs;
use super::commands::serve::ServeArgs;
use super::commands::soil::SoilArgs;

#[derive(Parser)]
#[command(name = "cropwise")]
#[command(about = "Cropwise - crop advisory backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Read configuration from this YAML file instead of .cropwise/
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the advisory HTTP API
    Serve(ServeArgs),

    /// Aggregate the soil profile around a point
    Soil(SoilArgs),

    /// Print the cache fingerprint of a request payload
    Fingerprint(FingerprintArgs),

    /// Response cache maintenance
    Cache(CacheArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::cache::CacheCommands;

    #[test]
    fn test_parse_soil_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "cropwise", "soil", "--lat", "-12.5", "--lon", "-45.25", "--no-cache", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Soil(args) => {
                assert!((args.lat + 12.5).abs() < f64::EPSILON);
                assert!((args.lon + 45.25).abs() < f64::EPSILON);
                assert!(args.no_cache);
                assert!(args.buffer.is_none());
            }
            _ => panic!("expected soil command"),
        }
    }

    #[test]
    fn test_parse_serve_and_cache() {
        let cli = Cli::try_parse_from(["cropwise", "--config", "cw.yaml", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cw.yaml")));
        assert!(matches!(cli.command, Commands::Serve(ref args) if args.port == Some(9000)));

        let cli = Cli::try_parse_from(["cropwise", "cache", "stats", "--max-age-secs", "60"]).unwrap();
        match cli.command {
            Commands::Cache(args) => {
                assert!(matches!(args.command, CacheCommands::Stats { max_age_secs: Some(60) }));
            }
            _ => panic!("expected cache command"),
        }
    }
}
