//! Resource-style JSON handlers mounted under `/api`.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod energy;
pub mod system;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};

use ecohub_app::ports::Adapters;
use ecohub_domain::operation::OperationResult;

use crate::error::status_for;
use crate::state::AppState;

/// Response of a mutating endpoint.
///
/// The body is always the [`OperationResult`]; only the status code depends
/// on the outcome.
pub enum OperationResponse {
    Ok(OperationResult),
    Created(OperationResult),
}

impl IntoResponse for OperationResponse {
    fn into_response(self) -> Response {
        let (success, result) = match self {
            Self::Ok(result) => (StatusCode::OK, result),
            Self::Created(result) => (StatusCode::CREATED, result),
        };
        let status = result.failure.map_or(success, status_for);
        (status, Json(result)).into_response()
    }
}

/// Build the `/api` sub-router.
pub fn routes<A: Adapters>() -> Router<AppState<A>> {
    Router::new()
        // Devices
        .route(
            "/devices",
            get(devices::list::<A>).post(devices::create::<A>),
        )
        .route(
            "/devices/{name}",
            get(devices::get::<A>).delete(devices::delete::<A>),
        )
        .route("/devices/{name}/toggle", post(devices::toggle::<A>))
        .route("/devices/{name}/on", post(devices::turn_on::<A>))
        .route("/devices/{name}/off", post(devices::turn_off::<A>))
        .route(
            "/devices/{name}/consumption",
            put(devices::update_consumption::<A>),
        )
        .route("/actuator/shutdown-all", post(devices::shutdown_all::<A>))
        // Energy
        .route(
            "/threshold",
            get(energy::get_threshold::<A>).put(energy::update_threshold::<A>),
        )
        .route("/consumption/total", get(energy::total_consumption::<A>))
        .route("/realtime", get(energy::realtime::<A>))
        .route("/history", get(energy::history::<A>))
        .route("/history/chart", get(energy::chart_history::<A>))
        .route("/predict", post(energy::predict::<A>))
        .route("/time", get(energy::time::<A>))
        // System
        .route("/status", get(system::status::<A>))
        .route("/notifications", get(system::notifications::<A>))
}
