pub mod cache;
pub mod chat;
pub mod config;
pub mod crop;
pub mod disease;
pub mod market;
pub mod soil;

pub use cache::{CacheEntry, EndpointCacheStats, DEFAULT_CACHE_TTL};
pub use chat::{ChatContext, ChatReply, ChatRequest};
pub use config::{
    CacheConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig, SoilConfig, SoilGridsConfig,
};
pub use crop::{
    Coordinates, CropEconomics, CropFeatures, CropRecommendation, CropRequest, DateRange,
};
pub use disease::{DiseaseDiagnosis, DiseasePrediction, LeafImage};
pub use market::{MarketQuote, MarketRequest, DEFAULT_MARKET_PRICE};
pub use soil::{
    AggregatedSoilProfile, BoundingBox, HealthStatus, SatelliteRequest, SoilProperty, SoilPropertySample,
    SoilQuery,
};
