//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `created_at`, `updated_at`, notification times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Milliseconds since the Unix epoch for the current instant.
///
/// Energy records and notification ids are keyed on this value.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_return_millis_between_surrounding_instants() {
        let before = Utc::now().timestamp_millis();
        let ms = now_millis();
        let after = Utc::now().timestamp_millis();
        assert!(ms >= before);
        assert!(ms <= after);
    }
}
