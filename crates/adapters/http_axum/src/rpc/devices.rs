//! `POST /rpc/devices`: the device service.

use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use ecohub_app::facade::EnergyFacade;
use ecohub_app::ports::Adapters;

use super::{Envelope, Fault, Reply, payload};
use crate::rest::devices::powered_on;
use crate::state::AppState;

pub const SERVICE: &str = "devices";

pub const OPERATIONS: &[&str] = &[
    "get_all_devices",
    "get_devices_by_status",
    "get_device_by_name",
    "toggle_device",
    "turn_on_device",
    "turn_off_device",
    "add_device",
    "remove_device",
    "update_device_consumption",
    "shutdown_all_devices",
];

#[derive(Deserialize)]
struct ByName {
    device_name: String,
}

#[derive(Deserialize)]
struct ByStatus {
    is_on: bool,
}

#[derive(Deserialize)]
struct AddDevice {
    name: String,
    base_consumption: f64,
    #[serde(default = "powered_on")]
    is_on: bool,
}

#[derive(Deserialize)]
struct UpdateConsumption {
    device_name: String,
    new_consumption: f64,
}

async fn dispatch<A: Adapters>(
    facade: &EnergyFacade<A>,
    envelope: &Envelope,
) -> Result<Value, Fault> {
    match envelope.operation.as_str() {
        "get_all_devices" => payload(facade.get_all_devices().await?),
        "get_devices_by_status" => {
            let ByStatus { is_on } = envelope.params()?;
            payload(facade.get_devices_by_status(is_on).await?)
        }
        "get_device_by_name" => {
            let ByName { device_name } = envelope.params()?;
            payload(facade.get_device_by_name(&device_name).await?)
        }
        "toggle_device" => {
            let ByName { device_name } = envelope.params()?;
            payload(facade.toggle_device(&device_name).await)
        }
        "turn_on_device" => {
            let ByName { device_name } = envelope.params()?;
            payload(facade.turn_on_device(&device_name).await)
        }
        "turn_off_device" => {
            let ByName { device_name } = envelope.params()?;
            payload(facade.turn_off_device(&device_name).await)
        }
        "add_device" => {
            let req: AddDevice = envelope.params()?;
            payload(
                facade
                    .add_device(&req.name, req.base_consumption, req.is_on)
                    .await,
            )
        }
        "remove_device" => {
            let ByName { device_name } = envelope.params()?;
            payload(facade.remove_device(&device_name).await)
        }
        "update_device_consumption" => {
            let req: UpdateConsumption = envelope.params()?;
            payload(
                facade
                    .update_device_consumption(&req.device_name, req.new_consumption)
                    .await,
            )
        }
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
