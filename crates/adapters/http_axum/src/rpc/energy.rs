//! `POST /rpc/energy`: threshold, history, predictions and status.

use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use ecohub_app::facade::EnergyFacade;
use ecohub_app::ports::Adapters;

use super::{Envelope, Fault, Reply, payload};
use crate::state::AppState;

pub const SERVICE: &str = "energy";

pub const OPERATIONS: &[&str] = &[
    "get_threshold",
    "update_threshold",
    "get_total_consumption",
    "get_realtime_data",
    "get_energy_history",
    "get_chart_history",
    "predict_energy_consumption",
    "get_current_time_data",
    "get_service_status",
    "get_notifications",
    "shutdown_all_devices",
];

#[derive(Deserialize)]
struct NewThreshold {
    new_threshold: f64,
}

#[derive(Deserialize)]
struct Limit {
    #[serde(default)]
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct Predict {
    hour: i64,
    day: i64,
    weekend: i64,
}

async fn dispatch<A: Adapters>(
    facade: &EnergyFacade<A>,
    envelope: &Envelope,
) -> Result<Value, Fault> {
    match envelope.operation.as_str() {
        "get_threshold" => payload(facade.get_threshold()),
        "update_threshold" => {
            let NewThreshold { new_threshold } = envelope.params()?;
            payload(facade.update_threshold(new_threshold))
        }
        "get_total_consumption" => payload(facade.get_total_consumption().await?),
        "get_realtime_data" => payload(facade.get_realtime_data().await?),
        "get_energy_history" => {
            let Limit { limit } = envelope.params()?;
            payload(facade.get_energy_history(limit).await?)
        }
        "get_chart_history" => {
            let Limit { limit } = envelope.params()?;
            payload(facade.get_chart_history(limit).await?)
        }
        "predict_energy_consumption" => {
            let Predict { hour, day, weekend } = envelope.params()?;
            payload(facade.predict_energy_consumption(hour, day, weekend).await?)
        }
        "get_current_time_data" => payload(facade.get_current_time_data().await),
        "get_service_status" => payload(facade.get_service_status().await),
        "get_notifications" => payload(facade.get_notifications()),
        "shutdown_all_devices" => payload(facade.shutdown_all_devices().await),
        other => Err(Fault::unknown_operation(SERVICE, other)),
    }
}

/// Handle one request document.
///
/// # Errors
///
/// Answers with a fault document when the request cannot be served.
pub async fn call<A: Adapters>(
    State(state): State<AppState<A>>,
    body: Bytes,
) -> Result<Reply, Fault> {
    let envelope = Envelope::parse(&body)?;
    let result = dispatch(&state.facade, &envelope).await?;
    Ok(Reply {
        operation: envelope.operation,
        result,
    })
}
