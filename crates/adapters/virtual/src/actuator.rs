use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ecohub_app::ports::Actuator;
use ecohub_domain::error::{EcoHubError, UnavailableError};

/// In-process actuator standing in for the remote power switch.
#[derive(Debug)]
pub struct VirtualActuator {
    reachable: AtomicBool,
    shutdowns: AtomicU64,
}

impl Default for VirtualActuator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VirtualActuator {
    #[must_use]
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
            shutdowns: AtomicU64::new(0),
        }
    }

    /// Simulate the link going up or down.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of shutdown commands accepted so far.
    #[must_use]
    pub fn shutdowns(&self) -> u64 {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl Actuator for VirtualActuator {
    fn shutdown_all(&self) -> impl Future<Output = Result<(), EcoHubError>> + Send {
        let result = if self.reachable.load(Ordering::SeqCst) {
            let count = self.shutdowns.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::warn!(count, "actuator: shutting down all devices");
            Ok(())
        } else {
            Err(UnavailableError {
                service: "Actuator",
                reason: "actuator is unreachable".to_string(),
            }
            .into())
        };
        async { result }
    }

    fn is_reachable(&self) -> impl Future<Output = bool> + Send {
        let reachable = self.reachable.load(Ordering::SeqCst);
        async move { reachable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_count_accepted_shutdowns() {
        let actuator = VirtualActuator::default();
        actuator.shutdown_all().await.unwrap();
        actuator.shutdown_all().await.unwrap();
        assert_eq!(actuator.shutdowns(), 2);
        assert!(actuator.is_reachable().await);
    }

    #[tokio::test]
    async fn should_fail_when_unreachable() {
        let actuator = VirtualActuator::new(false);
        let err = actuator.shutdown_all().await.unwrap_err();
        assert_eq!(err.describe(), "Actuator unavailable: actuator is unreachable");
        assert_eq!(actuator.shutdowns(), 0);

        actuator.set_reachable(true);
        assert!(actuator.shutdown_all().await.is_ok());
    }
}
