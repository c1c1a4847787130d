//! JSON REST handlers for the device registry.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use ecohub_app::ports::Adapters;
use ecohub_domain::device::{Device, DeviceList};

use super::OperationResponse;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Optional filter of the list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    pub is_on: Option<bool>,
}

/// Request body for adding a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub name: String,
    pub base_consumption: f64,
    #[serde(default = "powered_on")]
    pub is_on: bool,
}

pub(crate) fn powered_on() -> bool {
    true
}

/// Request body for changing a device's base consumption.
#[derive(Deserialize)]
pub struct UpdateConsumptionRequest {
    pub new_consumption: f64,
}

/// `GET /api/devices[?is_on=true|false]`
pub async fn list<A: Adapters>(
    State(state): State<AppState<A>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<DeviceList>, ApiError> {
    let devices = match query.is_on {
        Some(is_on) => state.facade.get_devices_by_status(is_on).await?,
        None => state.facade.get_all_devices().await?,
    };
    Ok(Json(devices))
}

/// `GET /api/devices/{name}`
pub async fn get<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(name): Path<String>,
) -> Result<Json<Device>, ApiError> {
    state
        .facade
        .get_device_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Device", name.trim()))
}

/// `POST /api/devices`
pub async fn create<A: Adapters>(
    State(state): State<AppState<A>>,
    ApiJson(req): ApiJson<CreateDeviceRequest>,
) -> OperationResponse {
    let result = state
        .facade
        .add_device(&req.name, req.base_consumption, req.is_on)
        .await;
    OperationResponse::Created(result)
}

/// `DELETE /api/devices/{name}`
pub async fn delete<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(name): Path<String>,
) -> OperationResponse {
    OperationResponse::Ok(state.facade.remove_device(&name).await)
}

/// `POST /api/devices/{name}/toggle`
pub async fn toggle<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(name): Path<String>,
) -> OperationResponse {
    OperationResponse::Ok(state.facade.toggle_device(&name).await)
}

/// `POST /api/devices/{name}/on`
pub async fn turn_on<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(name): Path<String>,
) -> OperationResponse {
    OperationResponse::Ok(state.facade.turn_on_device(&name).await)
}

/// `POST /api/devices/{name}/off`
pub async fn turn_off<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(name): Path<String>,
) -> OperationResponse {
    OperationResponse::Ok(state.facade.turn_off_device(&name).await)
}

/// `PUT /api/devices/{name}/consumption`
pub async fn update_consumption<A: Adapters>(
    State(state): State<AppState<A>>,
    Path(name): Path<String>,
    ApiJson(req): ApiJson<UpdateConsumptionRequest>,
) -> OperationResponse {
    let result = state
        .facade
        .update_device_consumption(&name, req.new_consumption)
        .await;
    OperationResponse::Ok(result)
}

/// `POST /api/actuator/shutdown-all`
pub async fn shutdown_all<A: Adapters>(State(state): State<AppState<A>>) -> OperationResponse {
    OperationResponse::Ok(state.facade.shutdown_all_devices().await)
}
