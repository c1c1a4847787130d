//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ecohub_domain::error::{EcoHubError, NotFoundError};
use ecohub_domain::operation::FailureKind;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`EcoHubError`] and extractor rejections to an HTTP response with
/// appropriate status code.
pub enum ApiError {
    Domain(EcoHubError),
    /// The request could not be decoded; `status` comes from the rejection.
    Rejected { status: StatusCode, message: String },
}

impl From<EcoHubError> for ApiError {
    fn from(err: EcoHubError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::Domain(
            NotFoundError {
                entity,
                id: id.into(),
            }
            .into(),
        )
    }
}

/// HTTP status for a failure kind, shared by every JSON endpoint.
pub(crate) fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Conflict => StatusCode::CONFLICT,
        FailureKind::Validation => StatusCode::BAD_REQUEST,
        FailureKind::Unavailable => StatusCode::BAD_GATEWAY,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Domain(err) => {
                let kind = FailureKind::from(&err);
                if kind == FailureKind::Internal {
                    tracing::error!(error = %err, "request failed");
                }
                (status_for(kind), err.describe())
            }
            Self::Rejected { status, message } => {
                tracing::debug!(%status, %message, "request rejected");
                (status, message)
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
