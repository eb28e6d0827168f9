//! Application services for the advisory flows.

pub mod cached_responder;
pub mod chat_service;
pub mod crop_recommendation;
pub mod disease_detection;
pub mod fingerprint;
pub mod market_price;
pub mod soil_aggregator;

pub use cached_responder::{CachedResponder, Computed};
pub use chat_service::ChatService;
pub use crop_recommendation::CropRecommendationService;
pub use disease_detection::{DiseaseDetectionService, ImageDigest};
pub use fingerprint::{fingerprint, fingerprint_of};
pub use market_price::MarketPriceService;
pub use soil_aggregator::SoilDataAggregator;
