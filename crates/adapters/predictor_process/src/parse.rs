use ecohub_domain::prediction::PREDICTION_MARKER;

/// Extract the first number following the prediction marker.
///
/// ```
/// use ecohub_adapter_predictor_process::parse_prediction;
///
/// let value = parse_prediction("Predicted energy consumption: 54.0 kWh");
/// assert_eq!(value, Some(54.0));
/// assert_eq!(parse_prediction("no forecast today"), None);
/// ```
#[must_use]
pub fn parse_prediction(output: &str) -> Option<f64> {
    let (_, rest) = output.split_once(PREDICTION_MARKER)?;
    let token = rest.split_whitespace().next()?;
    let numeric: String = token
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    numeric.parse::<f64>().ok().filter(|value| value.is_finite())
}
