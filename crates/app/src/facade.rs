//! Energy facade: the single business-logic layer behind every request surface.
//!
//! Transports only decode a request, call one method here and encode the
//! answer. Reads return `Result`; mutations never fail past this layer and
//! report problems through [`OperationResult`].

use std::sync::Arc;

use ecohub_domain::device::{Device, DeviceList};
use ecohub_domain::energy_record::{EnergyHistory, EnergyRecord};
use ecohub_domain::error::EcoHubError;
use ecohub_domain::notification::{Notification, NotificationKind};
use ecohub_domain::operation::{FailureKind, OperationResult};
use ecohub_domain::prediction::PredictionResponse;
use ecohub_domain::service_status::{FacadeState, Link, ServiceStatus};
use ecohub_domain::time_context::{TimeContext, TimeContextReading};

use crate::hub::Hub;
use crate::ports::{Actuator, Adapters, TimeContextProvider};

/// Source recorded on notifications raised by manual shutdowns.
pub const ACTUATOR_SOURCE: &str = "Actuator";
/// Source recorded on notifications raised by configuration changes.
pub const FACADE_SOURCE: &str = "Facade";

pub struct EnergyFacade<A: Adapters> {
    hub: Arc<Hub<A>>,
}

impl<A: Adapters> Clone for EnergyFacade<A> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<A: Adapters> EnergyFacade<A> {
    pub fn new(hub: Arc<Hub<A>>) -> Self {
        Self { hub }
    }

    // Devices

    /// # Errors
    ///
    /// Returns a storage error propagated from the registry.
    pub async fn get_all_devices(&self) -> Result<DeviceList, EcoHubError> {
        Ok(self.hub.devices.list_devices().await?.into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the registry.
    pub async fn get_devices_by_status(&self, is_on: bool) -> Result<DeviceList, EcoHubError> {
        Ok(self.hub.devices.list_by_status(is_on).await?.into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the registry.
    pub async fn get_device_by_name(&self, name: &str) -> Result<Option<Device>, EcoHubError> {
        self.hub.devices.find_device(name).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the registry.
    pub async fn get_total_consumption(&self) -> Result<f64, EcoHubError> {
        self.hub.devices.total_consumption().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn toggle_device(&self, name: &str) -> OperationResult {
        match self.hub.devices.toggle_device(name).await {
            Ok(device) => OperationResult::ok_with_device(
                format!("{} toggled successfully", device.name),
                device,
            ),
            Err(err) => err.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn turn_on_device(&self, name: &str) -> OperationResult {
        self.set_power(name, true).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn turn_off_device(&self, name: &str) -> OperationResult {
        self.set_power(name, false).await
    }

    async fn set_power(&self, name: &str, is_on: bool) -> OperationResult {
        match self.hub.devices.set_power(name, is_on).await {
            Ok(device) => {
                let word = if is_on { "ON" } else { "OFF" };
                OperationResult::ok_with_device(format!("{} turned {word}", device.name), device)
            }
            Err(err) => err.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_device(&self, name: &str, base_consumption: f64, is_on: bool) -> OperationResult {
        match self.hub.devices.add_device(name, base_consumption, is_on).await {
            Ok(device) => {
                tracing::info!(device_name = %device.name, "device added");
                OperationResult::ok_with_device(
                    format!("Device added successfully: {}", device.name),
                    device,
                )
            }
            Err(err) => err.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_device(&self, name: &str) -> OperationResult {
        match self.hub.devices.remove_device(name).await {
            Ok(()) => {
                tracing::info!(device_name = name.trim(), "device removed");
                OperationResult::ok(format!("Device removed: {}", name.trim()))
            }
            Err(err) => err.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_device_consumption(
        &self,
        name: &str,
        new_consumption: f64,
    ) -> OperationResult {
        match self
            .hub
            .devices
            .update_consumption(name, new_consumption)
            .await
        {
            Ok(device) => OperationResult::ok_with_device(
                format!("Consumption updated for {}", device.name),
                device,
            ),
            Err(err) => err.into(),
        }
    }

    /// Send the shutdown command, then switch every device off.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown_all_devices(&self) -> OperationResult {
        if let Err(err) = self.hub.actuator.shutdown_all().await {
            tracing::warn!(error = %err.describe(), "manual shutdown rejected by actuator");
            let reason = match err {
                EcoHubError::Unavailable(inner) => inner.reason,
                other => other.describe(),
            };
            return OperationResult::failed(
                FailureKind::Unavailable,
                format!("Actuator shutdown failed: {reason}"),
            );
        }
        if let Err(err) = self.hub.devices.power_off_all().await {
            return err.into();
        }
        self.hub.notifications.push(
            NotificationKind::Warning,
            "Manual shutdown command executed for all devices.",
            ACTUATOR_SOURCE,
        );
        tracing::info!("manual shutdown executed");
        OperationResult::ok("All devices shut down successfully")
    }

    // Threshold

    pub fn get_threshold(&self) -> f64 {
        self.hub.threshold.get().value()
    }

    #[tracing::instrument(skip(self))]
    pub fn update_threshold(&self, new_threshold: f64) -> OperationResult {
        match self.hub.threshold.set(new_threshold) {
            Ok(threshold) => {
                let message = format!("Threshold updated to {:?}", threshold.value());
                tracing::info!(threshold = threshold.value(), "threshold updated");
                self.hub
                    .notifications
                    .push(NotificationKind::Info, message.clone(), FACADE_SOURCE);
                OperationResult::ok(message)
            }
            Err(err) => EcoHubError::from(err).into(),
        }
    }

    // Energy

    /// # Errors
    ///
    /// Returns a storage error propagated from the history store.
    pub async fn get_realtime_data(&self) -> Result<Option<EnergyRecord>, EcoHubError> {
        self.hub.energy.latest().await
    }

    /// Recent samples, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the history store.
    pub async fn get_energy_history(&self, limit: Option<i64>) -> Result<EnergyHistory, EcoHubError> {
        let records = self.hub.energy.history(limit).await?;
        Ok(self.with_threshold(records))
    }

    /// Recent samples, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the history store.
    pub async fn get_chart_history(&self, limit: Option<i64>) -> Result<EnergyHistory, EcoHubError> {
        let records = self.hub.energy.chart_history(limit).await?;
        Ok(self.with_threshold(records))
    }

    fn with_threshold(&self, records: Vec<EnergyRecord>) -> EnergyHistory {
        EnergyHistory {
            records,
            threshold: self.get_threshold(),
        }
    }

    /// Predict consumption for an explicit time context.
    ///
    /// # Errors
    ///
    /// Returns [`EcoHubError::Validation`] when `hour`, `day` or `weekend` is
    /// out of range.
    #[tracing::instrument(skip(self))]
    pub async fn predict_energy_consumption(
        &self,
        hour: i64,
        day: i64,
        weekend: i64,
    ) -> Result<PredictionResponse, EcoHubError> {
        let context = TimeContext::new(hour, day, weekend)?;
        let prediction = self.hub.predictor.predict(context).await;
        Ok(PredictionResponse::new(prediction, self.hub.threshold.get()))
    }

    pub async fn get_current_time_data(&self) -> TimeContextReading {
        self.hub.time_context.context().await.into()
    }

    // Status

    pub async fn get_service_status(&self) -> ServiceStatus {
        ServiceStatus {
            time_context: Link::from(self.hub.time_context.context().await.is_some()),
            actuator: Link::from(self.hub.actuator.is_reachable().await),
            predictor: self.hub.predictor.mode(),
            storage: Link::from(self.hub.devices.is_storage_reachable().await),
            facade: FacadeState::Running,
        }
    }

    pub fn get_notifications(&self) -> Vec<Notification> {
        self.hub.notifications.list()
    }
}
