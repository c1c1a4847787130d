//! Device service: use-cases for the device registry.

use ecohub_domain::device::{DEFAULT_DEVICES, Device, validate_consumption};
use ecohub_domain::error::{EcoHubError, NotFoundError};

use crate::ports::DeviceRepository;

fn not_found(name: &str) -> EcoHubError {
    NotFoundError {
        entity: "Device",
        id: name.trim().to_string(),
    }
    .into()
}

/// Application service for the device registry.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Install the default devices when the registry is empty.
    ///
    /// Returns how many devices were inserted; zero when any device already
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn seed_defaults(&self) -> Result<usize, EcoHubError> {
        if self.repo.count().await? > 0 {
            tracing::debug!("registry already populated, skipping seed");
            return Ok(0);
        }
        let mut inserted = 0;
        for (name, base_consumption, is_on) in DEFAULT_DEVICES {
            let device = Device::builder()
                .name(name)
                .base_consumption(base_consumption)
                .is_on(is_on)
                .build()?;
            self.repo.insert(device).await?;
            inserted += 1;
        }
        tracing::info!(inserted, "seeded default devices");
        Ok(inserted)
    }

    /// Register a new device.
    ///
    /// # Errors
    ///
    /// Returns [`EcoHubError::Validation`] if invariants fail,
    /// [`EcoHubError::Conflict`] when the name is taken, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn add_device(
        &self,
        name: &str,
        base_consumption: f64,
        is_on: bool,
    ) -> Result<Device, EcoHubError> {
        let device = Device::builder()
            .name(name)
            .base_consumption(base_consumption)
            .is_on(is_on)
            .build()?;
        self.repo.insert(device).await
    }

    /// Look up a device by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn find_device(&self, name: &str) -> Result<Option<Device>, EcoHubError> {
        self.repo.find_by_name(name).await
    }

    /// List all devices, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, EcoHubError> {
        self.repo.list_all().await
    }

    /// List the devices that are on (or off).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_by_status(&self, is_on: bool) -> Result<Vec<Device>, EcoHubError> {
        self.repo.list_by_status(is_on).await
    }

    /// # Errors
    ///
    /// Returns [`EcoHubError::NotFound`] when no device is named `name`, or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_device(&self, name: &str) -> Result<Device, EcoHubError> {
        self.repo
            .toggle(name)
            .await?
            .ok_or_else(|| not_found(name))
    }

    /// # Errors
    ///
    /// Returns [`EcoHubError::NotFound`] when no device is named `name`, or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn set_power(&self, name: &str, is_on: bool) -> Result<Device, EcoHubError> {
        self.repo
            .set_power(name, is_on)
            .await?
            .ok_or_else(|| not_found(name))
    }

    /// Change the base consumption of a device.
    ///
    /// # Errors
    ///
    /// Returns [`EcoHubError::Validation`] for a negative value,
    /// [`EcoHubError::NotFound`] when no device is named `name`, or a storage
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn update_consumption(
        &self,
        name: &str,
        base_consumption: f64,
    ) -> Result<Device, EcoHubError> {
        validate_consumption(base_consumption)?;
        self.repo
            .update_consumption(name, base_consumption)
            .await?
            .ok_or_else(|| not_found(name))
    }

    /// # Errors
    ///
    /// Returns [`EcoHubError::NotFound`] when no device is named `name`, or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_device(&self, name: &str) -> Result<(), EcoHubError> {
        if self.repo.remove(name).await? {
            Ok(())
        } else {
            Err(not_found(name))
        }
    }

    /// Switch every device off.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn power_off_all(&self) -> Result<u64, EcoHubError> {
        self.repo.power_off_all().await
    }

    /// Sum of base consumption over the devices that are on.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn total_consumption(&self) -> Result<f64, EcoHubError> {
        self.repo.total_on_consumption().await
    }

    /// Whether the backing store answers.
    pub async fn is_storage_reachable(&self) -> bool {
        self.repo.count().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryDeviceRepo;
    use ecohub_domain::error::ValidationError;

    fn make_service() -> DeviceService<InMemoryDeviceRepo> {
        DeviceService::new(InMemoryDeviceRepo::default())
    }

    async fn seeded_service() -> DeviceService<InMemoryDeviceRepo> {
        let svc = make_service();
        svc.seed_defaults().await.unwrap();
        svc
    }

    #[tokio::test]
    async fn should_seed_five_defaults_once() {
        let svc = make_service();
        assert_eq!(svc.seed_defaults().await.unwrap(), 5);
        assert_eq!(svc.seed_defaults().await.unwrap(), 0);
        assert_eq!(svc.list_devices().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_not_seed_when_any_device_exists() {
        let svc = make_service();
        svc.add_device("Kettle", 2.0, false).await.unwrap();
        assert_eq!(svc.seed_defaults().await.unwrap(), 0);
        assert_eq!(svc.list_devices().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_duplicate_name_ignoring_case() {
        let svc = seeded_service().await;
        let result = svc.add_device("heating system", 1.0, true).await;
        assert!(matches!(result, Err(EcoHubError::Conflict(_))));
        assert_eq!(svc.list_devices().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let svc = make_service();
        let result = svc.add_device("  ", 1.0, true).await;
        assert!(matches!(
            result,
            Err(EcoHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[tokio::test]
    async fn should_return_to_original_state_after_two_toggles() {
        let svc = seeded_service().await;
        let original = svc.find_device("Heating System").await.unwrap().unwrap();

        let once = svc.toggle_device("Heating System").await.unwrap();
        assert_eq!(once.is_on, !original.is_on);
        let twice = svc.toggle_device("heating system").await.unwrap();
        assert_eq!(twice.is_on, original.is_on);
    }

    #[tokio::test]
    async fn should_return_not_found_when_toggling_missing_device() {
        let svc = seeded_service().await;
        let err = svc.toggle_device("Toaster").await.unwrap_err();
        assert_eq!(err.describe(), "Device not found: Toaster");
    }

    #[tokio::test]
    async fn should_sum_consumption_of_devices_that_are_on() {
        let svc = seeded_service().await;
        // Heating System + Water Heater + Lighting Grid
        assert!((svc.total_consumption().await.unwrap() - 50.0).abs() < f64::EPSILON);

        svc.set_power("Air Conditioner", true).await.unwrap();
        assert!((svc.total_consumption().await.unwrap() - 80.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_list_devices_by_status() {
        let svc = seeded_service().await;
        let on = svc.list_by_status(true).await.unwrap();
        let off = svc.list_by_status(false).await.unwrap();
        assert_eq!(on.len(), 3);
        assert_eq!(off.len(), 2);
        assert!(off.iter().all(|d| !d.is_on));
    }

    #[tokio::test]
    async fn should_reject_negative_consumption_update() {
        let svc = seeded_service().await;
        let result = svc.update_consumption("Lighting Grid", -4.0).await;
        assert!(matches!(result, Err(EcoHubError::Validation(_))));
    }

    #[tokio::test]
    async fn should_update_consumption() {
        let svc = seeded_service().await;
        let device = svc.update_consumption("Lighting Grid", 12.5).await.unwrap();
        assert!((device.base_consumption - 12.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_remove_device_once() {
        let svc = seeded_service().await;
        svc.remove_device("Water Heater").await.unwrap();
        assert!(matches!(
            svc.remove_device("Water Heater").await,
            Err(EcoHubError::NotFound(_))
        ));
        assert!(svc.find_device("Water Heater").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_power_off_everything() {
        let svc = seeded_service().await;
        assert_eq!(svc.power_off_all().await.unwrap(), 3);
        assert!(svc.list_by_status(true).await.unwrap().is_empty());
        assert!(svc.total_consumption().await.unwrap().abs() < f64::EPSILON);
    }
}
