//! Cropwise CLI entry point.

use clap::Parser;

use cropwise::cli::{commands, Cli, Commands};
use cropwise::infrastructure::logging::{LogConfig, LoggerImpl};
use cropwise::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_optional(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => cropwise::cli::handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => cropwise::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Soil(args) => commands::soil::execute(args, config, cli.json).await,
        Commands::Fingerprint(args) => commands::fingerprint::execute(args, cli.json),
        Commands::Cache(args) => commands::cache::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        cropwise::cli::handle_error(err, cli.json);
    }
}
