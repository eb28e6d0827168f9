//! Soil domain model.
//!
//! Soil properties are read from remote raster coverages, reduced to a
//! scalar per property, and combined into an [`AggregatedSoilProfile`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::crop::{Coordinates, DateRange};

/// NDVI threshold above which vegetation is considered healthy.
pub const HEALTHY_NDVI_THRESHOLD: f64 = 0.6;

/// Soil property served as a named coverage by the soil service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilProperty {
    /// pH in water, encoded as pH x 10
    Ph,
    /// Soil organic carbon, g/kg
    Soc,
    /// Sand fraction
    Sand,
    /// Clay fraction
    Clay,
    /// Silt fraction
    Silt,
    /// Bulk density of the fine earth fraction
    Bdod,
}

impl SoilProperty {
    /// Every property the coverage service is known to serve.
    pub const ALL: [Self; 6] = [
        Self::Ph,
        Self::Soc,
        Self::Sand,
        Self::Clay,
        Self::Silt,
        Self::Bdod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ph => "ph",
            Self::Soc => "soc",
            Self::Sand => "sand",
            Self::Clay => "clay",
            Self::Silt => "silt",
            Self::Bdod => "bdod",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ph" => Some(Self::Ph),
            "soc" => Some(Self::Soc),
            "sand" => Some(Self::Sand),
            "clay" => Some(Self::Clay),
            "silt" => Some(Self::Silt),
            "bdod" => Some(Self::Bdod),
            _ => None,
        }
    }

    /// Coverage identifier for the topsoil (0-5cm) mean layer.
    pub fn coverage_id(&self) -> &'static str {
        match self {
            Self::Ph => "phh2o_0-5cm_mean",
            Self::Soc => "soc_0-5cm_mean",
            Self::Sand => "sand_0-5cm_mean",
            Self::Clay => "clay_0-5cm_mean",
            Self::Silt => "silt_0-5cm_mean",
            Self::Bdod => "bdod_0-5cm_mean",
        }
    }
}

impl fmt::Display for SoilProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated point of interest with the buffer used to build its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub buffer_degrees: f64,
}

impl SoilQuery {
    /// Validate and build a query.
    ///
    /// Latitude must lie in [-90, 90], longitude in [-180, 180] and the
    /// buffer must be strictly positive. Non-finite values are rejected.
    pub fn new(latitude: f64, longitude: f64, buffer_degrees: f64) -> DomainResult<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && buffer_degrees.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
            && buffer_degrees > 0.0;

        if !valid {
            return Err(DomainError::InvalidCoordinate {
                latitude,
                longitude,
                buffer: buffer_degrees,
            });
        }

        Ok(Self {
            latitude,
            longitude,
            buffer_degrees,
        })
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.latitude, self.longitude, self.buffer_degrees)
    }
}

/// Latitude/longitude subset requested from the coverage service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Square box of half-width `buffer` centred on the point.
    pub fn around(latitude: f64, longitude: f64, buffer: f64) -> Self {
        Self {
            lat_min: latitude - buffer,
            lat_max: latitude + buffer,
            lon_min: longitude - buffer,
            lon_max: longitude + buffer,
        }
    }

    /// `Lat(min,max)` subset expression.
    pub fn lat_subset(&self) -> String {
        format!("Lat({:.6},{:.6})", self.lat_min, self.lat_max)
    }

    /// `Long(min,max)` subset expression.
    pub fn lon_subset(&self) -> String {
        format!("Long({:.6},{:.6})", self.lon_min, self.lon_max)
    }
}

/// A single property reduced to a scalar for a query region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilPropertySample {
    pub property: SoilProperty,
    pub latitude: f64,
    pub longitude: f64,
    pub buffer_degrees: f64,
    pub raw_value: f64,
}

impl SoilPropertySample {
    pub fn new(property: SoilProperty, query: &SoilQuery, raw_value: f64) -> Self {
        Self {
            property,
            latitude: query.latitude,
            longitude: query.longitude,
            buffer_degrees: query.buffer_degrees,
            raw_value,
        }
    }
}

/// Vegetation health derived from NDVI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Stressed,
}

impl HealthStatus {
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi > HEALTHY_NDVI_THRESHOLD {
            Self::Healthy
        } else {
            Self::Stressed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Stressed => "Stressed",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body of the satellite soil endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteRequest {
    pub coordinates: Coordinates,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

/// Combined soil profile returned to the satellite endpoint and used by
/// the recommendation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSoilProfile {
    pub ndvi: f64,
    pub health_status: HealthStatus,
    pub soil_ph: f64,
    /// Estimated nitrogen, mg/kg
    pub soil_nitrogen: f64,
    /// Organic carbon, percent
    pub soil_org_carbon: f64,
    /// Available water capacity, percent
    pub soil_water_content: f64,
    #[serde(rename = "recommendation")]
    pub recommendation_text: String,
    /// True iff at least one property fetch failed
    #[serde(default)]
    pub is_fallback: bool,
}

impl AggregatedSoilProfile {
    pub const FALLBACK_NDVI: f64 = 0.51;
    pub const FALLBACK_PH: f64 = 6.5;
    pub const FALLBACK_NITROGEN: f64 = 100.0;
    pub const FALLBACK_ORG_CARBON: f64 = 1.65;
    pub const FALLBACK_WATER_CONTENT: f64 = 20.0;
    pub const FALLBACK_RECOMMENDATION: &'static str =
        "Using mock soil data due to API error.";

    /// The fixed profile served whenever any upstream property is unavailable.
    pub fn fallback() -> Self {
        Self {
            ndvi: Self::FALLBACK_NDVI,
            health_status: HealthStatus::Stressed,
            soil_ph: Self::FALLBACK_PH,
            soil_nitrogen: Self::FALLBACK_NITROGEN,
            soil_org_carbon: Self::FALLBACK_ORG_CARBON,
            soil_water_content: Self::FALLBACK_WATER_CONTENT,
            recommendation_text: Self::FALLBACK_RECOMMENDATION.to_string(),
            is_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_round_trip_names() {
        for property in SoilProperty::ALL {
            assert_eq!(SoilProperty::from_str(property.as_str()), Some(property));
        }
        assert_eq!(SoilProperty::from_str("PH"), Some(SoilProperty::Ph));
        assert_eq!(SoilProperty::from_str("nitrogen"), None);
        assert_eq!(SoilProperty::Ph.coverage_id(), "phh2o_0-5cm_mean");
    }

    #[test]
    fn test_query_rejects_out_of_range() {
        assert!(SoilQuery::new(95.0, 0.0, 0.01).is_err());
        assert!(SoilQuery::new(-90.5, 0.0, 0.01).is_err());
        assert!(SoilQuery::new(0.0, 180.5, 0.01).is_err());
        assert!(SoilQuery::new(0.0, 0.0, 0.0).is_err());
        assert!(SoilQuery::new(f64::NAN, 0.0, 0.01).is_err());
        assert!(SoilQuery::new(90.0, -180.0, 0.01).is_ok());
    }

    #[test]
    fn test_bounding_box_around_point() {
        let query = SoilQuery::new(23.36, 85.33, 0.01).unwrap();
        let bbox = query.bounding_box();
        assert!((bbox.lat_min - 23.35).abs() < 1e-9);
        assert!((bbox.lat_max - 23.37).abs() < 1e-9);
        assert!((bbox.lon_min - 85.32).abs() < 1e-9);
        assert!((bbox.lon_max - 85.34).abs() < 1e-9);
        assert_eq!(bbox.lat_subset(), "Lat(23.350000,23.370000)");
        assert_eq!(bbox.lon_subset(), "Long(85.320000,85.340000)");
    }

    #[test]
    fn test_health_status_threshold() {
        assert_eq!(HealthStatus::from_ndvi(0.51), HealthStatus::Stressed);
        assert_eq!(HealthStatus::from_ndvi(0.6), HealthStatus::Stressed);
        assert_eq!(HealthStatus::from_ndvi(0.61), HealthStatus::Healthy);
    }

    #[test]
    fn test_profile_json_shape() {
        let json = serde_json::to_value(AggregatedSoilProfile::fallback()).unwrap();
        assert_eq!(json["health_status"], "Stressed");
        assert_eq!(json["soil_ph"], 6.5);
        assert_eq!(json["is_fallback"], true);
        assert!(json.get("recommendation").is_some());
        assert!(json.get("recommendation_text").is_none());
    }
}
