use std::time::Duration;

use ecohub_domain::error::{EcoHubError, UnavailableError};

/// Why the external predictor produced no usable value.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("failed to start predictor: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to read predictor output: {0}")]
    Io(#[source] std::io::Error),

    #[error("predictor produced no output stream")]
    NoOutput,

    #[error("predictor did not answer within {0:?}")]
    Timeout(Duration),

    #[error("predictor exited with status {0:?}")]
    Exit(Option<i32>),

    #[error("predictor output contains no prediction")]
    NoPrediction,
}

impl From<PredictorError> for EcoHubError {
    fn from(err: PredictorError) -> Self {
        UnavailableError {
            service: "Predictor",
            reason: err.to_string(),
        }
        .into()
    }
}
