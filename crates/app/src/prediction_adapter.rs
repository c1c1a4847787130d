//! Prediction adapter: external predictor with a deterministic local fallback.

use std::sync::atomic::{AtomicBool, Ordering};

use ecohub_domain::energy_record::round_to_tenth;
use ecohub_domain::prediction::fallback_prediction;
use ecohub_domain::service_status::PredictorMode;
use ecohub_domain::time_context::TimeContext;

use crate::ports::Predictor;

/// Always answers with a number.
///
/// When an external predictor is configured it is tried first; any failure
/// degrades silently to [`fallback_prediction`]. The source of the last answer
/// is remembered for status reporting.
pub struct PredictionAdapter<P> {
    predictor: Option<P>,
    last_external: AtomicBool,
}

impl<P: Predictor> PredictionAdapter<P> {
    /// Wrap an optional external predictor.
    pub fn new(predictor: Option<P>) -> Self {
        let configured = predictor.is_some();
        Self {
            predictor,
            last_external: AtomicBool::new(configured),
        }
    }

    /// Estimated consumption for `context`, rounded to one decimal place.
    #[tracing::instrument(skip(self))]
    pub async fn predict(&self, context: TimeContext) -> f64 {
        let external = match &self.predictor {
            Some(predictor) => match predictor.predict(context).await {
                Ok(value) if value.is_finite() => Some(value),
                Ok(value) => {
                    tracing::warn!(value, "external predictor returned a non-finite value, using fallback");
                    None
                }
                Err(err) => {
                    tracing::warn!(error = %err.describe(), "external predictor failed, using fallback");
                    None
                }
            },
            None => None,
        };
        self.last_external
            .store(external.is_some(), Ordering::Relaxed);
        round_to_tenth(external.unwrap_or_else(|| fallback_prediction(&context)))
    }

    /// Where the most recent prediction came from.
    pub fn mode(&self) -> PredictorMode {
        if self.last_external.load(Ordering::Relaxed) {
            PredictorMode::External
        } else {
            PredictorMode::Fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubPredictor;

    fn context() -> TimeContext {
        TimeContext::new(8, 2, 0).unwrap()
    }

    #[tokio::test]
    async fn should_use_external_value_when_available() {
        let adapter = PredictionAdapter::new(Some(StubPredictor(Some(61.27))));
        assert!((adapter.predict(context()).await - 61.3).abs() < 1e-9);
        assert_eq!(adapter.mode(), PredictorMode::External);
    }

    #[tokio::test]
    async fn should_fall_back_when_external_fails() {
        let adapter = PredictionAdapter::new(Some(StubPredictor(None)));
        assert!((adapter.predict(context()).await - 54.0).abs() < f64::EPSILON);
        assert_eq!(adapter.mode(), PredictorMode::Fallback);
    }

    #[tokio::test]
    async fn should_fall_back_on_non_finite_value() {
        let adapter = PredictionAdapter::new(Some(StubPredictor(Some(f64::NAN))));
        assert!((adapter.predict(context()).await - 54.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_always_use_fallback_without_predictor() {
        let adapter: PredictionAdapter<StubPredictor> = PredictionAdapter::new(None);
        assert_eq!(adapter.mode(), PredictorMode::Fallback);
        assert!((adapter.predict(context()).await - 54.0).abs() < f64::EPSILON);
        assert!((adapter.predict(context()).await - 54.0).abs() < f64::EPSILON);
    }
}
