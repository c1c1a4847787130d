//! Predictor port: external consumption forecasting.

use std::future::Future;

use ecohub_domain::error::EcoHubError;
use ecohub_domain::time_context::TimeContext;

/// An external oracle estimating consumption for a time context.
///
/// Any error is treated by [`crate::prediction_adapter::PredictionAdapter`]
/// as a reason to fall back to the local model.
pub trait Predictor {
    fn predict(&self, context: TimeContext) -> impl Future<Output = Result<f64, EcoHubError>> + Send;
}
