//! Raster property source port.

use async_trait::async_trait;

use crate::domain::errors::FetchResult;
use crate::domain::models::{SoilProperty, SoilPropertySample, SoilQuery};

/// Fetches one soil property for a region and reduces it to a scalar.
#[async_trait]
pub trait RasterPropertySource: Send + Sync {
    async fn fetch(&self, property: SoilProperty, query: &SoilQuery) -> FetchResult<SoilPropertySample>;
}
