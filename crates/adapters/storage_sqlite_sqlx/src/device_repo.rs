//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ecohub_app::ports::DeviceRepository;
use ecohub_domain::device::{Device, name_key};
use ecohub_domain::error::{ConflictError, EcoHubError};
use ecohub_domain::time::{Timestamp, now};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }

    fn all(values: Vec<Self>) -> Vec<Device> {
        values.into_iter().map(|w| w.0).collect()
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let name: String = row.try_get("name")?;
        let base_consumption: f64 = row.try_get("base_consumption")?;
        let is_on: bool = row.try_get("is_on")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Device {
            name,
            base_consumption,
            is_on,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (name, name_key, base_consumption, is_on, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_NAME: &str = "SELECT * FROM devices WHERE name_key = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY name_key";
const SELECT_BY_STATUS: &str = "SELECT * FROM devices WHERE is_on = ? ORDER BY name_key";
const SET_POWER: &str =
    "UPDATE devices SET is_on = ?, updated_at = ? WHERE name_key = ? RETURNING *";
const TOGGLE: &str =
    "UPDATE devices SET is_on = NOT is_on, updated_at = ? WHERE name_key = ? RETURNING *";
const UPDATE_CONSUMPTION: &str =
    "UPDATE devices SET base_consumption = ?, updated_at = ? WHERE name_key = ? RETURNING *";
const DELETE_BY_NAME: &str = "DELETE FROM devices WHERE name_key = ?";
const POWER_OFF_ALL: &str = "UPDATE devices SET is_on = 0, updated_at = ? WHERE is_on = 1";
const TOTAL_ON: &str = "SELECT COALESCE(SUM(base_consumption), 0.0) FROM devices WHERE is_on = 1";
const COUNT: &str = "SELECT COUNT(*) FROM devices";

/// `SQLite`-backed device registry.
///
/// Lookups and the unique index go through the `name_key` column, which holds
/// the folded form of the name (see [`name_key`]).
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn insert(&self, device: Device) -> impl Future<Output = Result<Device, EcoHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&device.name)
                .bind(name_key(&device.name))
                .bind(device.base_consumption)
                .bind(device.is_on)
                .bind(device.created_at.to_rfc3339())
                .bind(device.updated_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from);

            match result {
                Ok(_) => Ok(device),
                Err(err) if err.is_unique_violation() => Err(ConflictError {
                    entity: "Device",
                    id: device.name,
                }
                .into()),
                Err(err) => Err(err.into()),
            }
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Device>, EcoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name_key(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn list_all(&self) -> Result<Vec<Device>, EcoHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::all(rows))
    }

    async fn list_by_status(&self, is_on: bool) -> Result<Vec<Device>, EcoHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STATUS)
            .bind(is_on)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::all(rows))
    }

    async fn set_power(&self, name: &str, is_on: bool) -> Result<Option<Device>, EcoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SET_POWER)
            .bind(is_on)
            .bind(now().to_rfc3339())
            .bind(name_key(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn toggle(&self, name: &str) -> Result<Option<Device>, EcoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(TOGGLE)
            .bind(now().to_rfc3339())
            .bind(name_key(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update_consumption(
        &self,
        name: &str,
        base_consumption: f64,
    ) -> Result<Option<Device>, EcoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(UPDATE_CONSUMPTION)
            .bind(base_consumption)
            .bind(now().to_rfc3339())
            .bind(name_key(name))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn remove(&self, name: &str) -> Result<bool, EcoHubError> {
        let result = sqlx::query(DELETE_BY_NAME)
            .bind(name_key(name))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn power_off_all(&self) -> Result<u64, EcoHubError> {
        let result = sqlx::query(POWER_OFF_ALL)
            .bind(now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected())
    }

    async fn total_on_consumption(&self) -> Result<f64, EcoHubError> {
        let total: f64 = sqlx::query_scalar(TOTAL_ON)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(total)
    }

    async fn count(&self) -> Result<u64, EcoHubError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
