//! The shared state every request surface and the control loop operate on.

use ecohub_domain::threshold::Threshold;

use crate::notification_feed::NotificationFeed;
use crate::ports::Adapters;
use crate::prediction_adapter::PredictionAdapter;
use crate::services::device_service::DeviceService;
use crate::services::energy_service::EnergyService;
use crate::threshold_cell::ThresholdCell;

/// One instance per process, shared behind an `Arc`.
///
/// Each store keeps its own synchronisation: the repositories rely on their
/// backend, the feed and the threshold on their own lock.
pub struct Hub<A: Adapters> {
    pub devices: DeviceService<A::Devices>,
    pub energy: EnergyService<A::Records>,
    pub time_context: A::Clock,
    pub actuator: A::Actuator,
    pub predictor: PredictionAdapter<A::Predictor>,
    pub notifications: NotificationFeed,
    pub threshold: ThresholdCell,
}

impl<A: Adapters> Hub<A> {
    /// Assemble a hub from concrete adapters.
    pub fn new(
        devices: A::Devices,
        records: A::Records,
        time_context: A::Clock,
        actuator: A::Actuator,
        predictor: Option<A::Predictor>,
        threshold: Threshold,
    ) -> Self {
        Self {
            devices: DeviceService::new(devices),
            energy: EnergyService::new(records),
            time_context,
            actuator,
            predictor: PredictionAdapter::new(predictor),
            notifications: NotificationFeed::default(),
            threshold: ThresholdCell::new(threshold),
        }
    }
}
