//! Crop recommendation orchestration.

use std::sync::Arc;

use super::cached_responder::Computed;
use super::soil_aggregator::SoilDataAggregator;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Coordinates, CropEconomics, CropFeatures, CropRecommendation, CropRequest, DEFAULT_MARKET_PRICE,
};
use crate::domain::ports::{CropClassifier, LookupTable};

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Yield scaling from growing conditions, clamped to [0.5, 1.5].
pub fn yield_modifier(ph: f64, rainfall: f64, temperature: f64) -> f64 {
    ((ph / 7.0) * (rainfall / 900.0) * (temperature / 25.0)).clamp(0.5, 1.5)
}

/// Sustainability score in [0, 1].
pub fn sustainability_score(factor: f64, nitrogen: f64, phosphorus: f64) -> f64 {
    (factor * (nitrogen / 100.0) * (phosphorus / 40.0)).clamp(0.0, 1.0)
}

pub struct CropRecommendationService {
    classifier: Arc<dyn CropClassifier>,
    economics: Arc<dyn LookupTable<CropEconomics>>,
    prices: Arc<dyn LookupTable<f64>>,
    soil: Arc<SoilDataAggregator>,
    buffer_degrees: f64,
}

impl CropRecommendationService {
    pub fn new(
        classifier: Arc<dyn CropClassifier>,
        economics: Arc<dyn LookupTable<CropEconomics>>,
        prices: Arc<dyn LookupTable<f64>>,
        soil: Arc<SoilDataAggregator>,
        buffer_degrees: f64,
    ) -> Self {
        Self {
            classifier,
            economics,
            prices,
            soil,
            buffer_degrees,
        }
    }

    /// Recommend a crop for the request.
    ///
    /// When satellite data is requested, pH and nitrogen come from the soil
    /// profile; a fallback profile makes the result uncacheable.
    pub async fn recommend(&self, request: &CropRequest) -> DomainResult<Computed<CropRecommendation>> {
        request.validate()?;

        let mut features = CropFeatures {
            nitrogen: request.n,
            phosphorus: request.p,
            potassium: request.k,
            temperature: request.temperature,
            humidity: request.humidity,
            ph: request.ph,
            rainfall: request.rainfall,
        };

        let mut cacheable = true;
        let satellite = request.satellite_coordinates();
        if let Some(coords) = satellite {
            let profile = self.soil.aggregate(coords.lat, coords.lon, self.buffer_degrees).await?;
            features.ph = profile.soil_ph;
            features.nitrogen = profile.soil_nitrogen;
            cacheable = !profile.is_fallback;
        }

        let crop = self.classifier.predict(&features)?;
        let economics = self
            .economics
            .lookup_or_default(&crop)
            .ok_or_else(|| DomainError::UnknownCrop(crop.clone()))?;
        let market_price = round2(self.prices.lookup_or_default(&crop).unwrap_or(DEFAULT_MARKET_PRICE));

        let expected_yield =
            economics.base_yield * yield_modifier(features.ph, features.rainfall, features.temperature);
        let profit = expected_yield * market_price - expected_yield * economics.cost_per_kg;
        let sustainability =
            sustainability_score(economics.sustainability_factor, features.nitrogen, features.phosphorus);

        tracing::info!(crop = %crop, satellite = satellite.is_some(), "crop recommended");

        let recommendation = CropRecommendation {
            explanation: explain(&crop, &features, market_price, profit, satellite),
            crop,
            expected_yield: round2(expected_yield),
            profit: round2(profit),
            sustainability_score: round2(sustainability),
        };

        Ok(Computed { value: recommendation, cacheable })
    }
}

fn explain(
    crop: &str,
    features: &CropFeatures,
    market_price: f64,
    profit: f64,
    satellite: Option<Coordinates>,
) -> Vec<String> {
    let mut lines = Vec::new();

    if (6.0..=7.5).contains(&features.ph) {
        lines.push(format!("The soil pH ({:.1}) is ideal for {crop} growth.", features.ph));
    } else {
        lines.push(format!(
            "The soil pH ({:.1}) is slightly off for {crop}, consider soil amendments.",
            features.ph
        ));
    }
    if (700.0..=1000.0).contains(&features.rainfall) {
        lines.push(format!("Rainfall ({:.0} mm) is suitable for {crop}.", features.rainfall));
    }
    if (20.0..=30.0).contains(&features.temperature) {
        lines.push(format!("Temperature ({:.0}°C) is optimal for {crop}.", features.temperature));
    }
    if (60.0..=80.0).contains(&features.humidity) {
        lines.push(format!("Humidity ({:.0}%) is suitable for {crop}.", features.humidity));
    }
    lines.push(format!(
        "Market price (₹{market_price:.0}) makes {crop} profitable with estimated profit of ₹{profit:.0}."
    ));
    if let Some(coords) = satellite {
        lines.push(format!(
            "Recommendation based on satellite soil data for coordinates ({}, {}).",
            coords.lat, coords.lon
        ));
    }

    lines
}
