//! Collaborator status and the notification feed.

use axum::Json;
use axum::extract::State;

use ecohub_app::ports::Adapters;
use ecohub_domain::notification::Notification;
use ecohub_domain::service_status::ServiceStatus;

use crate::state::AppState;

/// `GET /api/status`
pub async fn status<A: Adapters>(State(state): State<AppState<A>>) -> Json<ServiceStatus> {
    Json(state.facade.get_service_status().await)
}

/// `GET /api/notifications`
pub async fn notifications<A: Adapters>(
    State(state): State<AppState<A>>,
) -> Json<Vec<Notification>> {
    Json(state.facade.get_notifications())
}
