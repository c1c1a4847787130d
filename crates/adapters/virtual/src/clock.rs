use std::future::Future;

use chrono::Local;

use ecohub_app::ports::TimeContextProvider;
use ecohub_domain::time_context::TimeContext;

/// Time context derived from the host's local clock.
///
/// Always reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl TimeContextProvider for LocalClock {
    fn context(&self) -> impl Future<Output = Option<TimeContext>> + Send {
        let context = TimeContext::from_datetime(&Local::now());
        async move { Some(context) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_always_provide_a_valid_context() {
        let context = LocalClock.context().await.unwrap();
        assert!(context.hour <= 23);
        assert!((1..=7).contains(&context.day_of_week));
        assert_eq!(context.is_weekend, context.day_of_week >= 6);
    }
}
