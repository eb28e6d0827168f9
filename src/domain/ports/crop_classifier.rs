//! Crop classifier port.

use crate::domain::errors::DomainResult;
use crate::domain::models::CropFeatures;

/// Opaque pretrained model mapping soil and climate features to a crop label.
pub trait CropClassifier: Send + Sync {
    fn predict(&self, features: &CropFeatures) -> DomainResult<String>;
}
