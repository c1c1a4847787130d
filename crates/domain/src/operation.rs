//! Outcome of a mutating operation, shared by every request surface.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::EcoHubError;

/// Why an operation failed, used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Conflict,
    Validation,
    Unavailable,
    Internal,
}

impl From<&EcoHubError> for FailureKind {
    fn from(err: &EcoHubError) -> Self {
        match err {
            EcoHubError::Validation(_) => Self::Validation,
            EcoHubError::NotFound(_) => Self::NotFound,
            EcoHubError::Conflict(_) => Self::Conflict,
            EcoHubError::Unavailable(_) => Self::Unavailable,
            EcoHubError::Storage(_) => Self::Internal,
        }
    }
}

/// Body returned by every mutating operation.
///
/// Failures never escape as errors: they are reported with `success: false`
/// and a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl OperationResult {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            device: None,
            failure: None,
        }
    }

    #[must_use]
    pub fn ok_with_device(message: impl Into<String>, device: Device) -> Self {
        Self {
            device: Some(device),
            ..Self::ok(message)
        }
    }

    #[must_use]
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            device: None,
            failure: Some(kind),
        }
    }
}

impl From<EcoHubError> for OperationResult {
    fn from(err: EcoHubError) -> Self {
        Self::failed(FailureKind::from(&err), err.describe())
    }
}
