//! Soil property aggregation.
//!
//! Four coverages are fetched concurrently and combined into an
//! [`AggregatedSoilProfile`]. If any of them is unavailable the whole
//! profile degrades to [`AggregatedSoilProfile::fallback`]; a partially
//! derived profile is never returned.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AggregatedSoilProfile, HealthStatus, SoilProperty, SoilQuery};
use crate::domain::ports::{RasterPropertySource, VegetationIndexSource};

/// Bounds of the available water capacity estimate, percent.
pub const WATER_CONTENT_RANGE: (f64, f64) = (5.0, 30.0);

/// Scaled coverage values for the four properties the profile needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilReadings {
    /// pH x 10
    pub ph: f64,
    /// g/kg
    pub soc: f64,
    pub sand: f64,
    pub clay: f64,
}

/// Available water capacity estimate from texture and organic matter.
pub fn available_water_capacity(sand: f64, clay: f64, soc: f64) -> f64 {
    let awc = 10.0 + 0.2 * clay + 0.1 * (soc / 10.0) - 0.05 * sand;
    awc.clamp(WATER_CONTENT_RANGE.0, WATER_CONTENT_RANGE.1)
}

/// Derive a profile from successful readings.
pub fn derive_profile(readings: SoilReadings, ndvi: f64) -> AggregatedSoilProfile {
    let soil_water_content = available_water_capacity(readings.sand, readings.clay, readings.soc);
    let soil_nitrogen = (readings.soc / 12.0) * 1000.0;
    let soil_org_carbon = readings.soc / 10.0;
    let soil_ph = readings.ph / 10.0;
    let health_status = HealthStatus::from_ndvi(ndvi);

    let recommendation_text = format!(
        "Crop health: {health_status}. Monitor irrigation (AWC: {soil_water_content:.2}%). \
         Adjust pH ({soil_ph:.2}) and nitrogen ({soil_nitrogen:.2} mg/kg) if needed."
    );

    AggregatedSoilProfile {
        ndvi,
        health_status,
        soil_ph,
        soil_nitrogen,
        soil_org_carbon,
        soil_water_content,
        recommendation_text,
        is_fallback: false,
    }
}

pub struct SoilDataAggregator {
    source: Arc<dyn RasterPropertySource>,
    vegetation: Arc<dyn VegetationIndexSource>,
}

impl SoilDataAggregator {
    pub fn new(source: Arc<dyn RasterPropertySource>, vegetation: Arc<dyn VegetationIndexSource>) -> Self {
        Self { source, vegetation }
    }

    /// Build the soil profile for a point.
    ///
    /// Only invalid coordinates fail; every upstream problem yields the
    /// fallback profile.
    pub async fn aggregate(&self, latitude: f64, longitude: f64, buffer_degrees: f64) -> DomainResult<AggregatedSoilProfile> {
        let query = SoilQuery::new(latitude, longitude, buffer_degrees)?;

        let fetched = futures::try_join!(
            self.source.fetch(SoilProperty::Ph, &query),
            self.source.fetch(SoilProperty::Soc, &query),
            self.source.fetch(SoilProperty::Sand, &query),
            self.source.fetch(SoilProperty::Clay, &query),
        );

        let profile = match fetched {
            Ok((ph, soc, sand, clay)) => {
                let readings = SoilReadings {
                    ph: ph.raw_value,
                    soc: soc.raw_value,
                    sand: sand.raw_value,
                    clay: clay.raw_value,
                };
                match self.vegetation.ndvi(&query).await {
                    Ok(ndvi) => derive_profile(readings, ndvi),
                    Err(e) => {
                        tracing::warn!(latitude, longitude, error = %e, "vegetation index unavailable, using fallback soil profile");
                        AggregatedSoilProfile::fallback()
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    latitude,
                    longitude,
                    property = %e.property(),
                    kind = e.kind(),
                    error = %e,
                    "soil property unavailable, using fallback soil profile"
                );
                AggregatedSoilProfile::fallback()
            }
        };

        Ok(profile)
    }
}
