//! Consumption threshold above which the control loop acts.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A strictly positive, finite consumption limit in kWh.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: f64 = 70.0;

    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveThreshold`] when `value` is zero,
    /// negative, or not finite.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::NonPositiveThreshold(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether `consumption` strictly exceeds this threshold.
    #[must_use]
    pub fn is_exceeded_by(self, consumption: f64) -> bool {
        consumption > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
