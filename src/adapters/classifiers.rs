//! Built-in model adapters.
//!
//! [`CentroidCropClassifier`] assigns the crop whose mean growing conditions
//! are nearest to the request. [`NoDiseaseModel`] stands in until an image
//! model is configured and reports the model as unavailable.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CropFeatures, DiseasePrediction, LeafImage};
use crate::domain::ports::{CropClassifier, DiseaseClassifier};

/// Per-feature spread used to put features on a comparable scale.
const FEATURE_SCALE: [f64; 7] = [37.0, 33.0, 51.0, 5.0, 22.0, 0.77, 55.0];

/// Mean N, P, K, temperature, humidity, pH and rainfall per crop.
const CROP_CENTROIDS: [(&str, [f64; 7]); 22] = [
    ("Rice", [79.9, 47.6, 39.9, 23.7, 82.3, 6.43, 236.0]),
    ("Maize", [77.8, 48.4, 19.8, 22.4, 65.1, 6.25, 84.8]),
    ("Chickpea", [40.1, 67.8, 79.9, 18.9, 16.9, 7.34, 80.1]),
    ("Kidneybeans", [20.8, 67.5, 20.0, 20.1, 21.6, 5.75, 105.9]),
    ("Pigeonpeas", [20.7, 67.7, 20.3, 27.7, 48.1, 5.79, 149.5]),
    ("Mothbeans", [21.4, 48.0, 20.2, 28.2, 53.2, 6.83, 51.2]),
    ("Mungbean", [20.99, 47.3, 19.9, 28.5, 85.5, 6.72, 48.4]),
    ("Blackgram", [40.0, 67.5, 19.2, 29.97, 65.1, 7.13, 67.9]),
    ("Lentil", [18.8, 68.4, 19.4, 24.5, 64.8, 6.93, 45.7]),
    ("Pomegranate", [18.9, 18.8, 40.2, 21.8, 90.1, 6.43, 107.5]),
    ("Banana", [100.2, 82.0, 50.1, 27.4, 80.4, 5.98, 104.6]),
    ("Mango", [20.1, 27.2, 29.9, 31.2, 50.2, 5.77, 94.7]),
    ("Grapes", [23.2, 132.5, 200.1, 23.8, 81.9, 6.03, 69.6]),
    ("Watermelon", [99.4, 17.0, 50.2, 25.6, 85.2, 6.5, 50.8]),
    ("Muskmelon", [100.3, 17.7, 50.1, 28.7, 92.3, 6.36, 24.7]),
    ("Apple", [20.8, 134.2, 199.9, 22.6, 92.3, 5.93, 112.7]),
    ("Orange", [19.6, 16.6, 10.0, 22.8, 92.2, 7.02, 110.5]),
    ("Papaya", [49.9, 59.1, 50.0, 33.7, 92.4, 6.74, 142.6]),
    ("Coconut", [21.98, 16.9, 30.6, 27.4, 94.8, 5.98, 175.7]),
    ("Cotton", [117.8, 46.2, 19.6, 24.0, 79.8, 6.91, 80.4]),
    ("Jute", [78.4, 46.9, 39.99, 24.96, 79.6, 6.73, 174.8]),
    ("Coffee", [101.2, 28.7, 29.9, 25.5, 58.9, 6.79, 158.1]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidCropClassifier;

impl CentroidCropClassifier {
    pub const fn new() -> Self {
        Self
    }

    /// Labels this classifier can return.
    pub fn labels() -> impl Iterator<Item = &'static str> {
        CROP_CENTROIDS.iter().map(|(label, _)| *label)
    }
}

fn scaled_distance(a: &[f64; 7], b: &[f64; 7]) -> f64 {
    a.iter()
        .zip(b)
        .zip(FEATURE_SCALE)
        .map(|((x, y), scale)| ((x - y) / scale).powi(2))
        .sum()
}

impl CropClassifier for CentroidCropClassifier {
    fn predict(&self, features: &CropFeatures) -> DomainResult<String> {
        let values = features.as_array();
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(DomainError::ValidationFailed(format!(
                "{} must be a finite number",
                CropFeatures::NAMES[pos]
            )));
        }

        CROP_CENTROIDS
            .iter()
            .map(|(label, centroid)| (*label, scaled_distance(&values, centroid)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| DomainError::ModelUnavailable("crop classifier has no classes".to_string()))
    }
}

/// Disease classifier used when no image model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiseaseModel;

#[async_trait]
impl DiseaseClassifier for NoDiseaseModel {
    async fn classify(&self, _image: &LeafImage) -> DomainResult<DiseasePrediction> {
        Err(DomainError::ModelUnavailable(
            "no disease classification model is configured".to_string(),
        ))
    }
}
