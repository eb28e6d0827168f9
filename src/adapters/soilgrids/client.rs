//! WCS client for the SoilGrids coverage service.
//!
//! Each property is requested as a GeoTIFF subset around the query point
//! and reduced to the mean of its valid pixels. Outbound requests share a
//! semaphore so that one aggregation cannot flood the service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Semaphore;

use super::raster::decode_raster_mean;
use crate::domain::errors::{DomainError, DomainResult, FetchError, FetchResult};
use crate::domain::models::{SoilGridsConfig, SoilProperty, SoilPropertySample, SoilQuery};
use crate::domain::ports::RasterPropertySource;

/// CRS the subset bounds are expressed in.
pub const SUBSETTING_CRS: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";

/// Content types accepted as a raster payload.
pub const RASTER_CONTENT_TYPES: [&str; 3] = ["image/tiff", "image/geotiff", "application/x-geotiff"];

/// Maximum characters of a rejected body kept in the error.
const SNIPPET_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct SoilGridsClient {
    http: Client,
    base_url: String,
    map_file: String,
    timeout_secs: u64,
    limiter: Arc<Semaphore>,
    archive_dir: Option<PathBuf>,
}

impl SoilGridsClient {
    pub fn new(config: &SoilGridsConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ExecutionFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            map_file: config.map_file.clone(),
            timeout_secs: config.timeout_secs,
            limiter: Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1))),
            archive_dir: config.archive_dir.as_ref().map(PathBuf::from),
        })
    }

    /// Query parameters of a GetCoverage request for one property.
    pub fn query_params(&self, property: SoilProperty, query: &SoilQuery) -> Vec<(&'static str, String)> {
        let bbox = query.bounding_box();
        vec![
            ("map", self.map_file.clone()),
            ("SERVICE", "WCS".to_string()),
            ("VERSION", "2.0.1".to_string()),
            ("REQUEST", "GetCoverage".to_string()),
            ("COVERAGEID", property.coverage_id().to_string()),
            ("FORMAT", "image/tiff".to_string()),
            ("SUBSETTINGCRS", SUBSETTING_CRS.to_string()),
            ("SUBSET", bbox.lat_subset()),
            ("SUBSET", bbox.lon_subset()),
        ]
    }

    /// Download the raw raster for one property.
    ///
    /// The timeout bounds the whole fetch, including the wait for a
    /// concurrency permit.
    pub async fn fetch_raster(&self, property: SoilProperty, query: &SoilQuery) -> FetchResult<Vec<u8>> {
        let deadline = Duration::from_secs(self.timeout_secs);
        tokio::time::timeout(deadline, self.fetch_raster_unbounded(property, query))
            .await
            .map_err(|_| FetchError::Timeout {
                property,
                timeout_secs: self.timeout_secs,
            })?
    }

    async fn fetch_raster_unbounded(&self, property: SoilProperty, query: &SoilQuery) -> FetchResult<Vec<u8>> {
        let _permit = self.limiter.acquire().await.map_err(|e| FetchError::Network {
            property,
            message: format!("fetch limiter closed: {e}"),
        })?;

        tracing::debug!(%property, lat = query.latitude, lon = query.longitude, "requesting coverage");

        let mut resp = self
            .http
            .get(&self.base_url)
            .query(&self.query_params(property, query))
            .send()
            .await
            .map_err(|e| self.transport_error(property, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                property,
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !is_raster_content_type(&content_type) {
            // only a prefix of a rejected body is read
            let mut prefix = Vec::new();
            while prefix.len() < SNIPPET_LEN * 4 {
                match resp.chunk().await {
                    Ok(Some(chunk)) => prefix.extend_from_slice(&chunk),
                    Ok(None) | Err(_) => break,
                }
            }
            return Err(FetchError::InvalidContentType {
                property,
                content_type,
                snippet: body_snippet(&prefix),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.transport_error(property, &e))?;
        Ok(body.to_vec())
    }

    fn transport_error(&self, property: SoilProperty, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                property,
                timeout_secs: self.timeout_secs,
            }
        } else {
            FetchError::Network {
                property,
                message: err.to_string(),
            }
        }
    }

    /// Keep a copy of the raw raster. Failures are logged and ignored.
    async fn archive(&self, property: SoilProperty, query: &SoilQuery, bytes: &[u8]) {
        let Some(dir) = &self.archive_dir else {
            return;
        };
        let path = dir.join(archive_file_name(property, query));

        let result = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, bytes).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(%property, path = %path.display(), error = %e, "failed to archive raster");
        }
    }
}

#[async_trait]
impl RasterPropertySource for SoilGridsClient {
    async fn fetch(&self, property: SoilProperty, query: &SoilQuery) -> FetchResult<SoilPropertySample> {
        let bytes = self.fetch_raster(property, query).await?;
        self.archive(property, query, &bytes).await;

        let raw_value = decode_raster_mean(property, &bytes)?;
        tracing::debug!(%property, raw_value, "decoded coverage");

        Ok(SoilPropertySample::new(property, query, raw_value))
    }
}

/// Archive file name for a raster, `soil_<property>_<lat>_<lon>.tif`.
pub fn archive_file_name(property: SoilProperty, query: &SoilQuery) -> String {
    format!("soil_{}_{}_{}.tif", property, query.latitude, query.longitude)
}

fn is_raster_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    RASTER_CONTENT_TYPES.contains(&mime.as_str())
}

fn body_snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(SNIPPET_LEN).collect()
}
