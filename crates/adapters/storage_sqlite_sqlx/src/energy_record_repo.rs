//! `SQLite` implementation of [`EnergyRecordRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ecohub_app::ports::EnergyRecordRepository;
use ecohub_domain::energy_record::{ConsumptionStatus, EnergyRecord};
use ecohub_domain::error::{ConflictError, EcoHubError};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(EnergyRecord);

fn small_int(row: &SqliteRow, column: &str) -> Result<u8, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    u8::try_from(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status: ConsumptionStatus = status
            .parse()
            .map_err(|err: String| sqlx::Error::Decode(err.into()))?;

        Ok(Self(EnergyRecord {
            timestamp: row.try_get("timestamp")?,
            hour: small_int(row, "hour")?,
            day_of_week: small_int(row, "day_of_week")?,
            is_weekend: row.try_get("is_weekend")?,
            actual_consumption: row.try_get("actual_consumption")?,
            predicted_consumption: row.try_get("predicted_consumption")?,
            status,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO energy_records
        (timestamp, hour, day_of_week, is_weekend, actual_consumption, predicted_consumption, status)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_LATEST: &str = "SELECT * FROM energy_records ORDER BY timestamp DESC LIMIT 1";

const SELECT_RECENT_DESC: &str = "SELECT * FROM energy_records ORDER BY timestamp DESC LIMIT ?";

const SELECT_RECENT_ASC: &str = r"
    SELECT * FROM (
        SELECT * FROM energy_records ORDER BY timestamp DESC LIMIT ?
    )
    ORDER BY timestamp ASC
";

/// `SQLite`-backed energy history.
pub struct SqliteEnergyRecordRepository {
    pool: SqlitePool,
}

impl SqliteEnergyRecordRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn recent(&self, query: &str, limit: u32) -> Result<Vec<EnergyRecord>, EcoHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl EnergyRecordRepository for SqliteEnergyRecordRepository {
    fn append(
        &self,
        record: EnergyRecord,
    ) -> impl Future<Output = Result<EnergyRecord, EcoHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(record.timestamp)
                .bind(i64::from(record.hour))
                .bind(i64::from(record.day_of_week))
                .bind(record.is_weekend)
                .bind(record.actual_consumption)
                .bind(record.predicted_consumption)
                .bind(record.status.as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from);

            match result {
                Ok(_) => Ok(record),
                Err(err) if err.is_unique_violation() => Err(ConflictError {
                    entity: "EnergyRecord",
                    id: record.timestamp.to_string(),
                }
                .into()),
                Err(err) => Err(err.into()),
            }
        }
    }

    async fn latest(&self) -> Result<Option<EnergyRecord>, EcoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn recent_newest_first(&self, limit: u32) -> Result<Vec<EnergyRecord>, EcoHubError> {
        self.recent(SELECT_RECENT_DESC, limit).await
    }

    async fn recent_chronological(&self, limit: u32) -> Result<Vec<EnergyRecord>, EcoHubError> {
        self.recent(SELECT_RECENT_ASC, limit).await
    }
}
