//! Common test utilities for integration tests
//!
//! Provides raster fixtures, stub ports and database helpers shared by the
//! integration test files.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use cropwise::adapters::http::{AppComponents, AppState};
use cropwise::adapters::sqlite::{create_migrated_test_pool, SqliteResponseCache};
use cropwise::domain::errors::{FetchError, FetchResult};
use cropwise::domain::models::{Config, SoilGridsConfig, SoilProperty, SoilPropertySample, SoilQuery};
use cropwise::domain::ports::RasterPropertySource;

/// GDAL nodata TIFF tag.
pub const GDAL_NODATA_TAG: u16 = 42113;

/// Create a temporary test database
///
/// Returns the path to a SQLite database file in a temporary directory.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("cache.db");
    (dir, db_path)
}

/// Single-row Float32 GeoTIFF holding `values`.
pub fn float_raster(values: &[f32]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut buf).expect("tiff encoder");
    encoder
        .write_image::<colortype::Gray32Float>(values.len() as u32, 1, values)
        .expect("write raster");
    buf.into_inner()
}

/// Single-row Float32 GeoTIFF with a GDAL nodata tag.
pub fn float_raster_with_nodata(values: &[f32], nodata: &str) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut buf).expect("tiff encoder");
    let mut image = encoder
        .new_image::<colortype::Gray32Float>(values.len() as u32, 1)
        .expect("new image");
    image
        .encoder()
        .write_tag(Tag::Unknown(GDAL_NODATA_TAG), nodata)
        .expect("nodata tag");
    image.write_data(values).expect("write raster");
    buf.into_inner()
}

/// Coverage client settings pointing at a mock server.
pub fn soilgrids_config(base_url: &str) -> SoilGridsConfig {
    SoilGridsConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..SoilGridsConfig::default()
    }
}

/// Raster source returning fixed readings, optionally failing one property.
pub struct StubRasterSource {
    pub failing: Option<SoilProperty>,
    pub calls: AtomicUsize,
}

impl StubRasterSource {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self {
            failing: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(property: SoilProperty) -> Arc<Self> {
        Arc::new(Self {
            failing: Some(property),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RasterPropertySource for StubRasterSource {
    async fn fetch(&self, property: SoilProperty, query: &SoilQuery) -> FetchResult<SoilPropertySample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing == Some(property) {
            return Err(FetchError::HttpStatus { property, status: 503 });
        }
        let raw = match property {
            SoilProperty::Ph => 65.0,
            SoilProperty::Soc => 12.0,
            SoilProperty::Sand => 40.0,
            SoilProperty::Clay => 20.0,
            SoilProperty::Silt | SoilProperty::Bdod => 0.0,
        };
        Ok(SoilPropertySample::new(property, query, raw))
    }
}

/// API state over an in-memory cache and the given raster source.
pub async fn test_state(raster: Arc<dyn RasterPropertySource>) -> (Arc<AppState>, SqlitePool) {
    let pool = create_migrated_test_pool().await.expect("migrated pool");
    let cache = Arc::new(SqliteResponseCache::new(pool.clone()));
    let config = Config::default();
    let components = AppComponents::with_defaults(cache, raster, config.soil.placeholder_ndvi);
    (Arc::new(AppState::new(components, &config)), pool)
}

/// Number of rows stored for an endpoint.
pub async fn cached_rows(pool: &SqlitePool, endpoint: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM response_cache WHERE endpoint = ?")
        .bind(endpoint)
        .fetch_one(pool)
        .await
        .expect("count rows")
}

/// Bind a listener that accepts connections and never answers.
///
/// Returns the base URL of the coverage endpoint on it. Accepted sockets are
/// held open for as long as the runtime lives.
pub async fn silent_coverage_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/mapserv")
}
