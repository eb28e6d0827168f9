//! Crop recommendation domain model.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Observation window attached to satellite requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Inputs for a crop recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRequest {
    pub ph: f64,
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub rainfall: f64,
    pub temperature: f64,
    #[serde(default = "default_humidity")]
    pub humidity: f64,
    pub market_price: f64,
    #[serde(default)]
    pub use_satellite: bool,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

const fn default_humidity() -> f64 {
    70.0
}

impl CropRequest {
    /// Reject non-finite inputs before they reach the classifier.
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("ph", self.ph),
            ("n", self.n),
            ("p", self.p),
            ("k", self.k),
            ("rainfall", self.rainfall),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("market_price", self.market_price),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(DomainError::ValidationFailed(format!(
                    "{name} must be a finite number"
                )));
            }
        }
        Ok(())
    }

    /// Satellite data is used only when requested and both the location and
    /// the observation window are provided.
    pub fn satellite_coordinates(&self) -> Option<Coordinates> {
        if self.use_satellite && self.date_range.is_some() {
            self.coordinates
        } else {
            None
        }
    }
}

/// Feature record consumed by the crop classifier.
///
/// Field order matches [`CropFeatures::NAMES`], the order the classifier
/// was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFeatures {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl CropFeatures {
    pub const NAMES: [&'static str; 7] = [
        "Nitrogen",
        "Phosphorus",
        "Potassium",
        "Temperature",
        "Humidity",
        "pH_Value",
        "Rainfall",
    ];

    pub fn as_array(&self) -> [f64; 7] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// Yield and cost figures for a crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropEconomics {
    /// kg per unit area
    pub base_yield: f64,
    pub sustainability_factor: f64,
    pub cost_per_kg: f64,
}

/// Recommendation returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop: String,
    pub expected_yield: f64,
    pub profit: f64,
    pub sustainability_score: f64,
    pub explanation: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json() -> &'static str {
        r#"{"ph": 6.5, "n": 90, "p": 42, "k": 43, "rainfall": 202.9,
            "temperature": 20.8, "market_price": 60}"#
    }

    #[test]
    fn test_request_defaults() {
        let req: CropRequest = serde_json::from_str(request_json()).unwrap();
        assert!((req.humidity - 70.0).abs() < f64::EPSILON);
        assert!(!req.use_satellite);
        assert!(req.coordinates.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_satellite_requires_window() {
        let mut req: CropRequest = serde_json::from_str(request_json()).unwrap();
        req.use_satellite = true;
        req.coordinates = Some(Coordinates { lat: 23.36, lon: 85.33 });
        assert!(req.satellite_coordinates().is_none());

        req.date_range = Some(DateRange {
            start: "2024-01-01".to_string(),
            end: "2024-01-31".to_string(),
        });
        assert_eq!(req.satellite_coordinates(), Some(Coordinates { lat: 23.36, lon: 85.33 }));
    }

    #[test]
    fn test_feature_order() {
        let features = CropFeatures {
            nitrogen: 1.0,
            phosphorus: 2.0,
            potassium: 3.0,
            temperature: 4.0,
            humidity: 5.0,
            ph: 6.0,
            rainfall: 7.0,
        };
        assert_eq!(features.as_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(CropFeatures::NAMES[5], "pH_Value");
    }
}
