//! Shared state of the HTTP API.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::adapters::classifiers::{CentroidCropClassifier, NoDiseaseModel};
use crate::adapters::soilgrids::SoilGridsClient;
use crate::adapters::sqlite::SqliteResponseCache;
use crate::adapters::tables;
use crate::adapters::vegetation::FixedVegetationIndex;
use crate::domain::errors::DomainResult;
use crate::domain::models::{AggregatedSoilProfile, Config, SatelliteRequest};
use crate::domain::ports::{
    CropClassifier, DiseaseClassifier, RasterPropertySource, ResponseCache, VegetationIndexSource,
};
use crate::services::{
    CachedResponder, Computed, ChatService, CropRecommendationService, DiseaseDetectionService, MarketPriceService,
    SoilDataAggregator,
};

/// Cache endpoint name of the satellite soil flow.
pub const SATELLITE_ENDPOINT: &str = "satellite";

/// Port implementations the API is assembled from.
pub struct AppComponents {
    pub cache: Arc<dyn ResponseCache>,
    pub raster: Arc<dyn RasterPropertySource>,
    pub vegetation: Arc<dyn VegetationIndexSource>,
    pub crop_classifier: Arc<dyn CropClassifier>,
    pub disease_classifier: Arc<dyn DiseaseClassifier>,
}

impl AppComponents {
    /// Built-in models and a fixed NDVI around the given cache and raster source.
    pub fn with_defaults(cache: Arc<dyn ResponseCache>, raster: Arc<dyn RasterPropertySource>, ndvi: f64) -> Self {
        Self {
            cache,
            raster,
            vegetation: Arc::new(FixedVegetationIndex::new(ndvi)),
            crop_classifier: Arc::new(CentroidCropClassifier::new()),
            disease_classifier: Arc::new(NoDiseaseModel),
        }
    }
}

pub struct AppState {
    pub responder: CachedResponder,
    pub soil: Arc<SoilDataAggregator>,
    pub recommendations: CropRecommendationService,
    pub market: MarketPriceService,
    pub disease: DiseaseDetectionService,
    pub chat: ChatService,
    pub buffer_degrees: f64,
}

impl AppState {
    pub fn new(components: AppComponents, config: &Config) -> Self {
        let prices = Arc::new(tables::market_prices());
        let soil = Arc::new(SoilDataAggregator::new(components.raster, components.vegetation));

        let responder = CachedResponder::new(components.cache)
            .with_ttl(config.cache.default_ttl())
            .with_single_flight(config.cache.single_flight);

        Self {
            responder,
            recommendations: CropRecommendationService::new(
                components.crop_classifier,
                Arc::new(tables::crop_economics()),
                prices.clone(),
                soil.clone(),
                config.soil.buffer_degrees,
            ),
            market: MarketPriceService::new(prices),
            disease: DiseaseDetectionService::new(components.disease_classifier, Arc::new(tables::pesticide_advice())),
            chat: ChatService::new(Arc::new(tables::government_schemes())),
            soil,
            buffer_degrees: config.soil.buffer_degrees,
        }
    }

    /// Soil profile for the requested point, served through the response
    /// cache. Fallback profiles are returned but never cached.
    pub async fn satellite_profile(&self, req: &SatelliteRequest) -> DomainResult<AggregatedSoilProfile> {
        self.responder
            .respond(SATELLITE_ENDPOINT, req, || async {
                let profile = self
                    .soil
                    .aggregate(req.coordinates.lat, req.coordinates.lon, self.buffer_degrees)
                    .await?;
                Ok(if profile.is_fallback {
                    Computed::uncacheable(profile)
                } else {
                    Computed::cacheable(profile)
                })
            })
            .await
    }

    /// Production wiring: SQLite cache and the SoilGrids coverage service.
    pub fn from_config(config: &Config, pool: SqlitePool) -> DomainResult<Self> {
        let cache = Arc::new(SqliteResponseCache::new(pool));
        let raster = Arc::new(SoilGridsClient::new(&config.soilgrids)?);
        let components = AppComponents::with_defaults(cache, raster, config.soil.placeholder_ndvi);
        Ok(Self::new(components, config))
    }
}
