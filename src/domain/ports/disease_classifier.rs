//! Disease classifier port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{DiseasePrediction, LeafImage};

/// Opaque image model labelling leaf diseases.
#[async_trait]
pub trait DiseaseClassifier: Send + Sync {
    async fn classify(&self, image: &LeafImage) -> DomainResult<DiseasePrediction>;
}
