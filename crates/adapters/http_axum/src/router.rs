//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ecohub_app::ports::Adapters;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the resource routes under `/api` and merges the RPC services at
/// `/rpc`. Includes a [`TraceLayer`] that logs each HTTP request/response at
/// the `DEBUG` level, and a permissive CORS layer for browser dashboards
/// served from another origin.
pub fn build<A: Adapters>(state: AppState<A>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::rest::routes())
        .merge(crate::rpc::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
