//! In-process holder of the process-wide consumption threshold.

use std::sync::{PoisonError, RwLock};

use ecohub_domain::error::ValidationError;
use ecohub_domain::threshold::Threshold;

/// Shared, mutable [`Threshold`].
#[derive(Debug, Default)]
pub struct ThresholdCell {
    value: RwLock<Threshold>,
}

impl ThresholdCell {
    #[must_use]
    pub fn new(initial: Threshold) -> Self {
        Self {
            value: RwLock::new(initial),
        }
    }

    #[must_use]
    pub fn get(&self) -> Threshold {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveThreshold`] and leaves the
    /// current value untouched when `value` is not strictly positive.
    pub fn set(&self, value: f64) -> Result<Threshold, ValidationError> {
        let threshold = Threshold::new(value)?;
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = threshold;
        Ok(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_with_initial_value() {
        let cell = ThresholdCell::new(Threshold::new(40.0).unwrap());
        assert!((cell.get().value() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_keep_previous_value_when_rejected() {
        let cell = ThresholdCell::default();
        assert!(cell.set(-3.0).is_err());
        assert!((cell.get().value() - 70.0).abs() < f64::EPSILON);

        cell.set(55.0).unwrap();
        assert!((cell.get().value() - 55.0).abs() < f64::EPSILON);
    }
}
