//! Actuator port: the remote power switch.

use std::future::Future;

use ecohub_domain::error::EcoHubError;

/// Remote capability able to cut power to every device at once.
pub trait Actuator {
    /// Send the shutdown command.
    ///
    /// Fails with [`EcoHubError::Unavailable`] when the actuator cannot be
    /// reached or refuses the command.
    fn shutdown_all(&self) -> impl Future<Output = Result<(), EcoHubError>> + Send;

    fn is_reachable(&self) -> impl Future<Output = bool> + Send;
}
