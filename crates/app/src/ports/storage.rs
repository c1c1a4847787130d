//! Storage port: repository traits for persistence.

use std::future::Future;

use ecohub_domain::device::Device;
use ecohub_domain::energy_record::EnergyRecord;
use ecohub_domain::error::EcoHubError;

/// The device registry.
///
/// Names are matched case-insensitively everywhere. Methods addressing a
/// single device return `None` (or `false`) when it does not exist; they only
/// fail on storage errors.
pub trait DeviceRepository {
    /// Insert a new device.
    ///
    /// Fails with [`EcoHubError::Conflict`] when a device with the same name,
    /// ignoring case, already exists.
    fn insert(&self, device: Device) -> impl Future<Output = Result<Device, EcoHubError>> + Send;

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send;

    /// Every device, ordered by name.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Device>, EcoHubError>> + Send;

    /// Devices whose power flag equals `is_on`, ordered by name.
    fn list_by_status(
        &self,
        is_on: bool,
    ) -> impl Future<Output = Result<Vec<Device>, EcoHubError>> + Send;

    fn set_power(
        &self,
        name: &str,
        is_on: bool,
    ) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send;

    /// Flip the power flag in a single atomic step.
    fn toggle(&self, name: &str) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send;

    fn update_consumption(
        &self,
        name: &str,
        base_consumption: f64,
    ) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send;

    /// Returns `false` when no device matched.
    fn remove(&self, name: &str) -> impl Future<Output = Result<bool, EcoHubError>> + Send;

    /// Switch every device off, returning how many changed state.
    fn power_off_all(&self) -> impl Future<Output = Result<u64, EcoHubError>> + Send;

    /// Sum of `base_consumption` over devices that are on.
    fn total_on_consumption(&self) -> impl Future<Output = Result<f64, EcoHubError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, EcoHubError>> + Send;
}

/// Append-only time-series of consumption samples.
pub trait EnergyRecordRepository {
    /// Append a record. A duplicate timestamp is a [`EcoHubError::Conflict`].
    fn append(
        &self,
        record: EnergyRecord,
    ) -> impl Future<Output = Result<EnergyRecord, EcoHubError>> + Send;

    fn latest(&self) -> impl Future<Output = Result<Option<EnergyRecord>, EcoHubError>> + Send;

    /// The `limit` most recent records, newest first.
    fn recent_newest_first(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<EnergyRecord>, EcoHubError>> + Send;

    /// The `limit` most recent records, oldest first.
    fn recent_chronological(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<EnergyRecord>, EcoHubError>> + Send;
}
