//! Time-context port: where "what time is it" comes from.

use std::future::Future;

use ecohub_domain::time_context::TimeContext;

/// Supplies the hour, day of week and weekend flag of the current instant.
pub trait TimeContextProvider {
    /// `None` when the provider cannot be reached.
    fn context(&self) -> impl Future<Output = Option<TimeContext>> + Send;
}
