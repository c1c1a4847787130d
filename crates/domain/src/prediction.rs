//! Consumption prediction: the local fallback model and the response shape.

use serde::{Deserialize, Serialize};

use crate::energy_record::{ConsumptionStatus, round_to_tenth};
use crate::threshold::Threshold;
use crate::time_context::TimeContext;

/// Phrase preceding the figure in an external predictor's output.
pub const PREDICTION_MARKER: &str = "Predicted energy consumption:";

/// Deterministic local estimate used when no external predictor answers.
///
/// Night hours lower the baseline, the morning and evening peaks raise it,
/// weekend daytime adds extra load, and the day of week adds a small cyclic
/// offset.
#[must_use]
pub fn fallback_prediction(context: &TimeContext) -> f64 {
    let hour = context.hour;
    let mut base = 35.0;
    match hour {
        0..=5 => base -= 10.0,
        6..=8 => base += 15.0,
        9..=16 => base += 5.0,
        17..=21 => base += 25.0,
        _ => {}
    }
    if context.is_weekend && (9..=16).contains(&hour) {
        base += 10.0;
    }
    base += f64::from(context.day_of_week % 3) * 2.0;
    round_to_tenth(base)
}

/// Answer to a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
    pub status: ConsumptionStatus,
    pub threshold: f64,
}

impl PredictionResponse {
    #[must_use]
    pub fn new(prediction: f64, threshold: Threshold) -> Self {
        Self {
            prediction,
            status: ConsumptionStatus::classify(prediction, threshold),
            threshold: threshold.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predict(hour: i64, day: i64, weekend: i64) -> f64 {
        fallback_prediction(&TimeContext::new(hour, day, weekend).unwrap())
    }

    #[test]
    fn should_predict_morning_peak_on_tuesday() {
        assert!((predict(8, 2, 0) - 54.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_be_deterministic() {
        assert!((predict(8, 2, 0) - predict(8, 2, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn should_lower_night_baseline() {
        // 35 - 10 + (3 % 3) * 2
        assert!((predict(3, 3, 0) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_add_weekend_daytime_load() {
        // 35 + 5 + 10 + (6 % 3) * 2
        assert!((predict(12, 6, 1) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_apply_evening_peak() {
        // 35 + 25 + (1 % 3) * 2
        assert!((predict(19, 1, 0) - 62.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_keep_base_late_evening() {
        // 35 + (7 % 3) * 2
        assert!((predict(22, 7, 1) - 37.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_flag_prediction_above_threshold() {
        let threshold = Threshold::new(50.0).unwrap();
        let response = PredictionResponse::new(54.0, threshold);
        assert_eq!(response.status, ConsumptionStatus::Elevated);
        assert!((response.threshold - 50.0).abs() < f64::EPSILON);
    }
}
