//! Vegetation index port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::SoilQuery;

/// Source of NDVI readings for a region.
#[async_trait]
pub trait VegetationIndexSource: Send + Sync {
    async fn ndvi(&self, query: &SoilQuery) -> DomainResult<f64>;
}
