//! Cropwise - crop advisory backend
//!
//! Cropwise serves crop recommendations, market quotes, disease diagnoses and
//! soil profiles aggregated from remote raster coverages, memoizing responses
//! in a durable SQLite cache keyed by canonical request fingerprints.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Service Layer** (`services`): Advisory flows and the cached responder
//! - **Adapters** (`adapters`): SQLite cache, coverage client, HTTP API, static tables
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use cropwise::adapters::http::{ApiServer, AppState};
//! use cropwise::adapters::sqlite::initialize_from_config;
//! use cropwise::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let pool = initialize_from_config(&config.database).await?;
//!     let state = AppState::from_config(&config, pool)?;
//!     ApiServer::new(std::sync::Arc::new(state), config.server.clone()).serve().await
//!         .map_err(|e| anyhow::anyhow!(e))
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, FetchError};
pub use domain::models::{
    AggregatedSoilProfile, CacheEntry, Config, CropRecommendation, CropRequest, MarketQuote,
    MarketRequest, SatelliteRequest, SoilProperty, SoilQuery,
};
pub use domain::ports::{RasterPropertySource, ResponseCache};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{fingerprint, CachedResponder, SoilDataAggregator};
