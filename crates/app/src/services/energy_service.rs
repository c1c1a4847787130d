//! Energy service: use-cases for the consumption history.

use ecohub_domain::energy_record::{EnergyRecord, clamp_history_limit};
use ecohub_domain::error::EcoHubError;

use crate::ports::EnergyRecordRepository;

/// Application service over the append-only energy history.
pub struct EnergyService<R> {
    repo: R,
}

impl<R: EnergyRecordRepository> EnergyService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Append a sample.
    ///
    /// # Errors
    ///
    /// Returns [`EcoHubError::Conflict`] for a reused timestamp, or a storage
    /// error.
    #[tracing::instrument(skip(self, record), fields(timestamp = record.timestamp))]
    pub async fn record(&self, record: EnergyRecord) -> Result<EnergyRecord, EcoHubError> {
        self.repo.append(record).await
    }

    /// The most recent sample, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn latest(&self) -> Result<Option<EnergyRecord>, EcoHubError> {
        self.repo.latest().await
    }

    /// Recent samples, newest first. `limit` defaults to 100 and is clamped to
    /// `1..=1000`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn history(&self, limit: Option<i64>) -> Result<Vec<EnergyRecord>, EcoHubError> {
        self.repo
            .recent_newest_first(clamp_history_limit(limit))
            .await
    }

    /// Same window as [`Self::history`], oldest first, for charting.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn chart_history(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<EnergyRecord>, EcoHubError> {
        self.repo
            .recent_chronological(clamp_history_limit(limit))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryRecordRepo;
    use ecohub_domain::threshold::Threshold;
    use ecohub_domain::time_context::TimeContext;

    fn record(timestamp: i64) -> EnergyRecord {
        EnergyRecord::evaluate(
            timestamp,
            TimeContext::new(10, 2, 0).unwrap(),
            50.0,
            45.0,
            Threshold::default(),
        )
    }

    async fn service_with(count: i64) -> EnergyService<InMemoryRecordRepo> {
        let svc = EnergyService::new(InMemoryRecordRepo::default());
        for ts in 1..=count {
            svc.record(record(ts)).await.unwrap();
        }
        svc
    }

    #[tokio::test]
    async fn should_return_none_when_history_empty() {
        let svc = service_with(0).await;
        assert!(svc.latest().await.unwrap().is_none());
        assert!(svc.history(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_latest_record() {
        let svc = service_with(3).await;
        assert_eq!(svc.latest().await.unwrap().unwrap().timestamp, 3);
    }

    #[tokio::test]
    async fn should_return_exactly_n_after_fewer_than_limit_writes() {
        let svc = service_with(7).await;
        assert_eq!(svc.history(Some(100)).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn should_never_return_more_than_default_limit() {
        let svc = service_with(120).await;
        let history = svc.history(None).await.unwrap();
        assert_eq!(history.len(), 100);
        assert_eq!(history[0].timestamp, 120);
    }

    #[tokio::test]
    async fn should_order_chart_history_chronologically() {
        let svc = service_with(5).await;
        let chart = svc.chart_history(Some(3)).await.unwrap();
        let timestamps: Vec<i64> = chart.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![3, 4, 5]);

        let newest: Vec<i64> = svc
            .history(Some(3))
            .await
            .unwrap()
            .iter()
            .map(|r| r.timestamp)
            .collect();
        assert_eq!(newest, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn should_reject_duplicate_timestamp() {
        let svc = service_with(1).await;
        assert!(matches!(
            svc.record(record(1)).await,
            Err(EcoHubError::Conflict(_))
        ));
    }
}
