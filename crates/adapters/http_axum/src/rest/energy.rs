//! JSON REST handlers for threshold, consumption history and predictions.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use ecohub_app::ports::Adapters;
use ecohub_domain::energy_record::{EnergyHistory, EnergyRecord};
use ecohub_domain::prediction::PredictionResponse;
use ecohub_domain::time_context::TimeContextReading;

use super::OperationResponse;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Request body for changing the alert threshold.
#[derive(Deserialize)]
pub struct UpdateThresholdRequest {
    pub new_threshold: f64,
}

/// Query string of the history endpoints.
#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Request body for an explicit prediction.
#[derive(Deserialize)]
pub struct PredictRequest {
    pub hour: i64,
    pub day: i64,
    pub weekend: i64,
}

/// `GET /api/threshold`
pub async fn get_threshold<A: Adapters>(State(state): State<AppState<A>>) -> Json<f64> {
    Json(state.facade.get_threshold())
}

/// `PUT /api/threshold`
pub async fn update_threshold<A: Adapters>(
    State(state): State<AppState<A>>,
    ApiJson(req): ApiJson<UpdateThresholdRequest>,
) -> OperationResponse {
    OperationResponse::Ok(state.facade.update_threshold(req.new_threshold))
}

/// `GET /api/consumption/total`
pub async fn total_consumption<A: Adapters>(
    State(state): State<AppState<A>>,
) -> Result<Json<f64>, ApiError> {
    Ok(Json(state.facade.get_total_consumption().await?))
}

/// `GET /api/realtime`
pub async fn realtime<A: Adapters>(
    State(state): State<AppState<A>>,
) -> Result<Json<EnergyRecord>, ApiError> {
    state
        .facade
        .get_realtime_data()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("EnergyRecord", "latest"))
}

/// `GET /api/history[?limit=N]`
pub async fn history<A: Adapters>(
    State(state): State<AppState<A>>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<EnergyHistory>, ApiError> {
    Ok(Json(state.facade.get_energy_history(query.limit).await?))
}

/// `GET /api/history/chart[?limit=N]`
pub async fn chart_history<A: Adapters>(
    State(state): State<AppState<A>>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<EnergyHistory>, ApiError> {
    Ok(Json(state.facade.get_chart_history(query.limit).await?))
}

/// `POST /api/predict`
pub async fn predict<A: Adapters>(
    State(state): State<AppState<A>>,
    ApiJson(req): ApiJson<PredictRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let response = state
        .facade
        .predict_energy_consumption(req.hour, req.day, req.weekend)
        .await?;
    Ok(Json(response))
}

/// `GET /api/time`
pub async fn time<A: Adapters>(State(state): State<AppState<A>>) -> Json<TimeContextReading> {
    Json(state.facade.get_current_time_data().await)
}
