//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`EcoHubError`]
//! via `#[from]`. The display text of the leaf errors is operator-facing: the
//! facade copies it verbatim into failed operation results.

/// Top-level error shared by every port and service.
#[derive(Debug, thiserror::Error)]
pub enum EcoHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("conflict")]
    Conflict(#[from] ConflictError),

    #[error("unavailable")]
    Unavailable(#[from] UnavailableError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EcoHubError {
    /// Operator-facing description of the underlying cause.
    ///
    /// Storage failures are reported generically so that driver details do
    /// not leak to callers.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::NotFound(err) => err.to_string(),
            Self::Conflict(err) => err.to_string(),
            Self::Unavailable(err) => err.to_string(),
            Self::Storage(_) => "Internal storage error".to_string(),
        }
    }
}

/// Invariant violations on user-supplied values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Device name must not be empty")]
    EmptyName,

    #[error("Consumption must be a non-negative number, got {0}")]
    InvalidConsumption(f64),

    #[error("Threshold must be positive")]
    NonPositiveThreshold(f64),

    #[error("Hour must be between 0 and 23, got {0}")]
    HourOutOfRange(i64),

    #[error("Day must be between 1 and 7, got {0}")]
    DayOutOfRange(i64),

    #[error("Weekend flag must be 0 or 1, got {0}")]
    WeekendOutOfRange(i64),
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A write would break a uniqueness invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} already exists: {id}")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
}

/// An external collaborator could not be reached or refused the command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service} unavailable: {reason}")]
pub struct UnavailableError {
    pub service: &'static str,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_describe_not_found_with_entity_and_id() {
        let err: EcoHubError = NotFoundError {
            entity: "Device",
            id: "Toaster".to_string(),
        }
        .into();
        assert_eq!(err.describe(), "Device not found: Toaster");
    }

    #[test]
    fn should_describe_conflict_with_entity_and_id() {
        let err: EcoHubError = ConflictError {
            entity: "Device",
            id: "Water Heater".to_string(),
        }
        .into();
        assert_eq!(err.describe(), "Device already exists: Water Heater");
    }

    #[test]
    fn should_describe_threshold_validation() {
        let err: EcoHubError = ValidationError::NonPositiveThreshold(-1.0).into();
        assert_eq!(err.describe(), "Threshold must be positive");
    }

    #[test]
    fn should_hide_storage_details() {
        let err = EcoHubError::Storage(Box::new(std::io::Error::other("disk on fire")));
        assert_eq!(err.describe(), "Internal storage error");
    }
}
