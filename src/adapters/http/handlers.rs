//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::Json;
use serde::Serialize;

use super::error::ApiError;
use super::state::AppState;
use crate::domain::models::{
    AggregatedSoilProfile, ChatReply, ChatRequest, CropRecommendation, CropRequest, DiseaseDiagnosis, LeafImage,
    MarketQuote, MarketRequest, SatelliteRequest,
};
use crate::services::{Computed, DiseaseDetectionService, ImageDigest};

pub use super::state::SATELLITE_ENDPOINT;
pub const RECOMMENDATIONS_ENDPOINT: &str = "recommendations";
pub const MARKET_ENDPOINT: &str = "market";
pub const DISEASE_ENDPOINT: &str = "disease";

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Crop advisory backend is running",
    })
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn satellite(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SatelliteRequest>, JsonRejection>,
) -> ApiResult<AggregatedSoilProfile> {
    let req = json_body(payload)?;
    Ok(Json(state.satellite_profile(&req).await?))
}

pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CropRequest>, JsonRejection>,
) -> ApiResult<CropRecommendation> {
    let req = json_body(payload)?;
    let recommendation = state
        .responder
        .respond(RECOMMENDATIONS_ENDPOINT, &req, || state.recommendations.recommend(&req))
        .await?;
    Ok(Json(recommendation))
}

pub async fn market(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarketRequest>, JsonRejection>,
) -> ApiResult<MarketQuote> {
    let req = json_body(payload)?;
    let quote = state
        .responder
        .respond(MARKET_ENDPOINT, &req, || async { state.market.quote(&req).map(Computed::cacheable) })
        .await?;
    Ok(Json(quote))
}

pub async fn disease(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> ApiResult<DiseaseDiagnosis> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload = Some(LeafImage {
            file_name,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let image = upload.ok_or_else(|| ApiError::BadRequest("missing multipart field 'file'".to_string()))?;
    DiseaseDetectionService::validate(&image)?;

    let digest = ImageDigest::of(&image);
    let diagnosis = state
        .responder
        .respond(DISEASE_ENDPOINT, &digest, || async {
            state.disease.diagnose(&image).await.map(Computed::cacheable)
        })
        .await?;
    Ok(Json(diagnosis))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatReply> {
    let req = json_body(payload)?;
    Ok(Json(state.chat.reply(&req)?))
}
