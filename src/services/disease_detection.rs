//! Leaf disease diagnosis.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DiseaseDiagnosis, LeafImage};
use crate::domain::ports::{DiseaseClassifier, LookupTable};

/// Cache payload standing in for the image bytes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImageDigest {
    pub image_hash: String,
}

impl ImageDigest {
    pub fn of(image: &LeafImage) -> Self {
        Self {
            image_hash: hex::encode(Sha256::digest(&image.bytes)),
        }
    }
}

pub struct DiseaseDetectionService {
    classifier: Arc<dyn DiseaseClassifier>,
    advice: Arc<dyn LookupTable<String>>,
}

impl DiseaseDetectionService {
    pub fn new(classifier: Arc<dyn DiseaseClassifier>, advice: Arc<dyn LookupTable<String>>) -> Self {
        Self { classifier, advice }
    }

    /// Reject uploads the classifier cannot take.
    pub fn validate(image: &LeafImage) -> DomainResult<()> {
        if !image.has_allowed_extension() {
            return Err(DomainError::ValidationFailed(
                "Only JPEG or PNG images are supported.".to_string(),
            ));
        }
        if image.bytes.is_empty() {
            return Err(DomainError::ValidationFailed("Uploaded image is empty.".to_string()));
        }
        Ok(())
    }

    pub async fn diagnose(&self, image: &LeafImage) -> DomainResult<DiseaseDiagnosis> {
        Self::validate(image)?;

        let prediction = self.classifier.classify(image).await?;
        let recommendation = self
            .advice
            .lookup_or_default(&prediction.label)
            .unwrap_or_default();

        tracing::info!(disease = %prediction.label, confidence = prediction.confidence, "leaf classified");

        Ok(DiseaseDiagnosis {
            disease: prediction.label,
            confidence: prediction.confidence,
            recommendation,
        })
    }
}
