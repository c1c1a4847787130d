//! Energy records: immutable samples appended by the control loop.

use serde::{Deserialize, Serialize};

use crate::threshold::Threshold;
use crate::time_context::TimeContext;

/// Default number of records returned by history queries.
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;
/// Upper bound on the number of records a single history query may return.
pub const MAX_HISTORY_LIMIT: u32 = 1000;

/// Clamp a caller-supplied history limit to `1..=MAX_HISTORY_LIMIT`.
#[must_use]
pub fn clamp_history_limit(limit: Option<i64>) -> u32 {
    match limit {
        None => DEFAULT_HISTORY_LIMIT,
        Some(value) => {
            let clamped = value.clamp(1, i64::from(MAX_HISTORY_LIMIT));
            u32::try_from(clamped).unwrap_or(DEFAULT_HISTORY_LIMIT)
        }
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Whether a sample stayed within the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsumptionStatus {
    Normal,
    Elevated,
}

impl ConsumptionStatus {
    /// Classify `consumption` against `threshold`.
    #[must_use]
    pub fn classify(consumption: f64, threshold: Threshold) -> Self {
        if threshold.is_exceeded_by(consumption) {
            Self::Elevated
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Elevated => "ELEVATED",
        }
    }
}

impl std::str::FromStr for ConsumptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(Self::Normal),
            "ELEVATED" => Ok(Self::Elevated),
            other => Err(format!("unknown consumption status: {other}")),
        }
    }
}

/// One time-series sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecord {
    /// Milliseconds since the Unix epoch; unique and strictly increasing.
    pub timestamp: i64,
    pub hour: u8,
    pub day_of_week: u8,
    pub is_weekend: bool,
    pub actual_consumption: f64,
    pub predicted_consumption: f64,
    pub status: ConsumptionStatus,
}

impl EnergyRecord {
    /// Build a record from raw readings.
    ///
    /// Both consumption figures are rounded to one decimal place and the
    /// status is evaluated on the rounded actual value, so a stored record
    /// always satisfies `status == Elevated` iff `actual > threshold`.
    #[must_use]
    pub fn evaluate(
        timestamp: i64,
        context: TimeContext,
        actual: f64,
        predicted: f64,
        threshold: Threshold,
    ) -> Self {
        let actual_consumption = round_to_tenth(actual);
        Self {
            timestamp,
            hour: context.hour,
            day_of_week: context.day_of_week,
            is_weekend: context.is_weekend,
            actual_consumption,
            predicted_consumption: round_to_tenth(predicted),
            status: ConsumptionStatus::classify(actual_consumption, threshold),
        }
    }

    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.status == ConsumptionStatus::Elevated
    }
}

/// History snapshot together with the threshold in force when it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyHistory {
    pub records: Vec<EnergyRecord>,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TimeContext {
        TimeContext::new(14, 3, 0).unwrap()
    }

    #[test]
    fn should_round_to_one_decimal() {
        assert!((round_to_tenth(54.04) - 54.0).abs() < f64::EPSILON);
        assert!((round_to_tenth(54.06) - 54.1).abs() < 1e-9);
        assert!((round_to_tenth(-1.26) + 1.3).abs() < 1e-9);
    }

    #[test]
    fn should_mark_normal_when_below_threshold() {
        let record = EnergyRecord::evaluate(1, context(), 55.0, 60.0, Threshold::default());
        assert_eq!(record.status, ConsumptionStatus::Normal);
        assert_eq!(record.hour, 14);
        assert_eq!(record.day_of_week, 3);
        assert!(!record.is_weekend);
    }

    #[test]
    fn should_mark_elevated_when_above_threshold() {
        let threshold = Threshold::new(40.0).unwrap();
        let record = EnergyRecord::evaluate(1, context(), 55.0, 60.0, threshold);
        assert!(record.is_elevated());
    }

    #[test]
    fn should_evaluate_status_on_rounded_actual() {
        let threshold = Threshold::new(70.0).unwrap();
        let record = EnergyRecord::evaluate(1, context(), 70.04, 0.0, threshold);
        assert!((record.actual_consumption - 70.0).abs() < f64::EPSILON);
        assert_eq!(record.status, ConsumptionStatus::Normal);
    }

    #[test]
    fn should_default_and_clamp_history_limit() {
        assert_eq!(clamp_history_limit(None), 100);
        assert_eq!(clamp_history_limit(Some(0)), 1);
        assert_eq!(clamp_history_limit(Some(-7)), 1);
        assert_eq!(clamp_history_limit(Some(5000)), 1000);
        assert_eq!(clamp_history_limit(Some(25)), 25);
    }

    #[test]
    fn should_serialize_status_uppercase() {
        let json = serde_json::to_string(&ConsumptionStatus::Elevated).unwrap();
        assert_eq!(json, "\"ELEVATED\"");
        assert_eq!("NORMAL".parse::<ConsumptionStatus>(), Ok(ConsumptionStatus::Normal));
    }
}
