//! End-to-end tests of the advisory API router.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cropwise::adapters::http::build_router;
use cropwise::domain::models::SoilProperty;
use cropwise::domain::ports::RasterPropertySource;

use common::StubRasterSource;

const BOUNDARY: &str = "cropwise-test-boundary";

async fn router_with(raster: Arc<dyn RasterPropertySource>) -> (Router, sqlx::SqlitePool) {
    let (state, pool) = common::test_state(raster).await;
    (build_router(state, true), pool)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_upload(file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/disease/")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn rice_request() -> Value {
    json!({
        "ph": 6.5, "n": 90, "p": 42, "k": 43,
        "rainfall": 202.9, "temperature": 20.8, "humidity": 82,
        "market_price": 60
    })
}

#[tokio::test]
async fn test_root_and_health() {
    let (router, _pool) = router_with(StubRasterSource::healthy()).await;

    let (status, body) = send(&router, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Crop advisory backend is running");

    let response = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_satellite_profile_is_cached() {
    let raster = StubRasterSource::healthy();
    let (router, pool) = router_with(raster.clone()).await;
    let request = json!({"coordinates": {"lat": 23.36, "lon": 85.33}, "date_range": {"start": "2024-01-01", "end": "2024-01-31"}});

    let (status, first) = send(&router, post_json("/satellite/", &request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["soil_ph"], 6.5);
    assert_eq!(first["health_status"], "Stressed");
    assert_eq!(raster.calls(), 4);

    // Same request with keys reordered hits the cache.
    let reordered = json!({"date_range": {"end": "2024-01-31", "start": "2024-01-01"}, "coordinates": {"lon": 85.33, "lat": 23.36}});
    let (status, second) = send(&router, post_json("/satellite", &reordered)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(raster.calls(), 4);
    assert_eq!(common::cached_rows(&pool, "satellite").await, 1);
}

#[tokio::test]
async fn test_fallback_profile_is_not_cached() {
    let raster = StubRasterSource::failing(SoilProperty::Sand);
    let (router, pool) = router_with(raster).await;
    let request = json!({"coordinates": {"lat": 10.0, "lon": 20.0}});

    let (status, body) = send(&router, post_json("/satellite/", &request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "Using mock soil data due to API error.");
    assert_eq!(body["soil_ph"], 6.5);
    assert_eq!(common::cached_rows(&pool, "satellite").await, 0);
}

#[tokio::test]
async fn test_invalid_coordinates_rejected() {
    let (router, _pool) = router_with(StubRasterSource::healthy()).await;
    let request = json!({"coordinates": {"lat": 123.0, "lon": 85.33}});

    let (status, body) = send(&router, post_json("/satellite/", &request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_COORDINATES");
}

#[tokio::test]
async fn test_recommendation_for_rice_profile() {
    let (router, pool) = router_with(StubRasterSource::healthy()).await;

    let (status, body) = send(&router, post_json("/recommendations/", &rice_request())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crop"], "Rice");
    assert!(body["explanation"].as_array().is_some_and(|lines| !lines.is_empty()));
    assert_eq!(common::cached_rows(&pool, "recommendations").await, 1);

    let (_, again) = send(&router, post_json("/recommendations", &rice_request())).await;
    assert_eq!(body, again);
    assert_eq!(common::cached_rows(&pool, "recommendations").await, 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (router, _pool) = router_with(StubRasterSource::healthy()).await;

    let (status, body) = send(&router, post_json("/recommendations/", &json!({"ph": "acidic"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_market_quote() {
    let (router, pool) = router_with(StubRasterSource::healthy()).await;

    let (status, body) = send(&router, post_json("/market/", &json!({"crop": "Rice"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"crop": "Rice", "market_price": 60.0}));

    let (_, unknown) = send(&router, post_json("/market/", &json!({"crop": "Quinoa"}))).await;
    assert_eq!(unknown["market_price"], 50.0);
    assert_eq!(common::cached_rows(&pool, "market").await, 2);
}

#[tokio::test]
async fn test_disease_upload_validation() {
    let (router, _pool) = router_with(StubRasterSource::healthy()).await;

    let (status, body) = send(&router, post_upload("leaf.gif", b"GIF89a")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_disease_without_model_is_unavailable() {
    let (router, pool) = router_with(StubRasterSource::healthy()).await;

    let (status, body) = send(&router, post_upload("leaf.jpg", &[0xff, 0xd8, 0xff, 0xe0])).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "MODEL_UNAVAILABLE");
    assert_eq!(common::cached_rows(&pool, "disease").await, 0);
}

#[tokio::test]
async fn test_chat_is_translated_and_not_cached() {
    let (router, pool) = router_with(StubRasterSource::healthy()).await;
    let request = json!({"message": "When should I sow?", "context": {"crop": "Rice"}, "language": "hi"});

    let (status, body) = send(&router, post_json("/chat", &request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "hi");
    let response = body["response"].as_str().unwrap();
    assert!(response.starts_with("[Hindi] "));
    assert!(response.contains("PM-KISAN"));

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM response_cache")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 0);
}
