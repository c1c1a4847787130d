//! Document-style RPC surface.
//!
//! Each service accepts `POST /rpc/{service}` with a wrapped document
//! `{"operation": "<name>", "params": {...}}` and answers
//! `{"operation": "<name>", "result": <payload>}`. The payload is exactly the
//! body the resource-style route returns for the same operation.
//!
//! Failures that prevent an operation from running are reported as
//! `{"fault": {"code": "Client" | "Server", "message": "..."}}`.

pub mod devices;
pub mod energy;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ecohub_app::ports::Adapters;
use ecohub_domain::error::EcoHubError;
use ecohub_domain::operation::FailureKind;

use crate::state::AppState;

/// Incoming request document.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub operation: String,
    #[serde(default)]
    pub params: Value,
}

impl Envelope {
    /// Decode a request body.
    ///
    /// # Errors
    ///
    /// Returns a client fault when the body is not a valid envelope.
    pub fn parse(body: &[u8]) -> Result<Self, Fault> {
        serde_json::from_slice(body)
            .map_err(|err| Fault::client(format!("Malformed request document: {err}")))
    }

    /// Decode the operation parameters. A missing `params` member reads as an
    /// empty object.
    ///
    /// # Errors
    ///
    /// Returns a client fault when the parameters do not match the operation.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, Fault> {
        let params = match &self.params {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other.clone(),
        };
        serde_json::from_value(params).map_err(|err| {
            Fault::client(format!("Invalid parameters for {}: {err}", self.operation))
        })
    }
}

/// Successful response document.
#[derive(Debug, Serialize)]
pub struct Reply {
    pub operation: String,
    pub result: Value,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Who is to blame for a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaultCode {
    Client,
    Server,
}

#[derive(Debug, Serialize)]
struct FaultDetail {
    code: FaultCode,
    message: String,
}

/// Error response document.
#[derive(Debug, Serialize)]
pub struct Fault {
    fault: FaultDetail,
}

impl Fault {
    pub fn client(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Client, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Server, message)
    }

    fn new(code: FaultCode, message: impl Into<String>) -> Self {
        Self {
            fault: FaultDetail {
                code,
                message: message.into(),
            },
        }
    }

    pub(crate) fn unknown_operation(service: &str, operation: &str) -> Self {
        Self::client(format!("Unknown operation for {service} service: {operation}"))
    }

    #[must_use]
    pub fn code(&self) -> FaultCode {
        self.fault.code
    }
}

impl From<EcoHubError> for Fault {
    fn from(err: EcoHubError) -> Self {
        match FailureKind::from(&err) {
            FailureKind::Validation | FailureKind::NotFound | FailureKind::Conflict => {
                Self::client(err.describe())
            }
            FailureKind::Unavailable | FailureKind::Internal => {
                tracing::error!(error = %err, "rpc operation failed");
                Self::server(err.describe())
            }
        }
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let status = match self.fault.code {
            FaultCode::Client => StatusCode::BAD_REQUEST,
            FaultCode::Server => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Encode an operation payload as the `result` member.
pub(crate) fn payload<T: Serialize>(value: T) -> Result<Value, Fault> {
    serde_json::to_value(value).map_err(|err| Fault::server(err.to_string()))
}

/// Description of one service, served by `GET /rpc`.
#[derive(Debug, Serialize)]
struct ServiceDescription {
    name: &'static str,
    endpoint: &'static str,
    operations: &'static [&'static str],
}

async fn describe() -> Json<Vec<ServiceDescription>> {
    Json(vec![
        ServiceDescription {
            name: devices::SERVICE,
            endpoint: "/rpc/devices",
            operations: devices::OPERATIONS,
        },
        ServiceDescription {
            name: energy::SERVICE,
            endpoint: "/rpc/energy",
            operations: energy::OPERATIONS,
        },
    ])
}

/// Build the RPC routes. Paths are absolute so the router can be merged.
pub fn routes<A: Adapters>() -> Router<AppState<A>> {
    Router::new()
        .route("/rpc", get(describe))
        .route("/rpc/devices", post(devices::call::<A>))
        .route("/rpc/energy", post(energy::call::<A>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecohub_domain::error::ValidationError;

    #[derive(Debug, Deserialize)]
    struct LimitParams {
        #[serde(default)]
        limit: Option<i64>,
    }

    #[test]
    fn should_parse_envelope_without_params() {
        let envelope = Envelope::parse(br#"{"operation":"get_all_devices"}"#).unwrap();
        assert_eq!(envelope.operation, "get_all_devices");

        let params: LimitParams = envelope.params().unwrap();
        assert!(params.limit.is_none());
    }

    #[test]
    fn should_report_malformed_document_as_client_fault() {
        let fault = Envelope::parse(b"not json").unwrap_err();
        assert_eq!(fault.code(), FaultCode::Client);

        let fault = Envelope::parse(br#"{"params":{}}"#).unwrap_err();
        assert_eq!(fault.code(), FaultCode::Client);
    }

    #[test]
    fn should_report_wrong_params_as_client_fault() {
        let envelope =
            Envelope::parse(br#"{"operation":"get_energy_history","params":{"limit":"x"}}"#)
                .unwrap();
        let fault = envelope.params::<LimitParams>().unwrap_err();
        assert_eq!(fault.code(), FaultCode::Client);
    }

    #[test]
    fn should_serialize_fault_document() {
        let fault = Fault::from(EcoHubError::from(ValidationError::HourOutOfRange(24)));
        let json = serde_json::to_value(&fault).unwrap();
        assert_eq!(json["fault"]["code"], "Client");
        assert!(json["fault"]["message"].is_string());
    }
}
