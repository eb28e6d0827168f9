//! Vegetation index adapters.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::SoilQuery;
use crate::domain::ports::VegetationIndexSource;

/// Returns the same NDVI for every region.
#[derive(Debug, Clone, Copy)]
pub struct FixedVegetationIndex {
    ndvi: f64,
}

impl FixedVegetationIndex {
    pub const fn new(ndvi: f64) -> Self {
        Self { ndvi }
    }
}

#[async_trait]
impl VegetationIndexSource for FixedVegetationIndex {
    async fn ndvi(&self, _query: &SoilQuery) -> DomainResult<f64> {
        Ok(self.ndvi)
    }
}
