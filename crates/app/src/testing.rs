//! In-memory doubles of every port, shared by the unit tests of this crate.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ecohub_domain::device::{Device, name_key};
use ecohub_domain::energy_record::EnergyRecord;
use ecohub_domain::error::{ConflictError, EcoHubError, UnavailableError};
use ecohub_domain::threshold::Threshold;
use ecohub_domain::time::now;
use ecohub_domain::time_context::TimeContext;

use crate::hub::Hub;
use crate::ports::{
    Actuator, Adapters, DeviceRepository, EnergyRecordRepository, Predictor, TimeContextProvider,
};

#[derive(Default)]
pub struct InMemoryDeviceRepo {
    store: Mutex<Vec<Device>>,
}

impl InMemoryDeviceRepo {
    fn update_with(&self, name: &str, f: impl FnOnce(&mut Device)) -> Option<Device> {
        let mut store = self.store.lock().unwrap();
        let device = store.iter_mut().find(|d| d.matches_name(name))?;
        f(device);
        device.updated_at = now();
        Some(device.clone())
    }
}

impl DeviceRepository for InMemoryDeviceRepo {
    fn insert(&self, device: Device) -> impl Future<Output = Result<Device, EcoHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.iter().any(|d| d.matches_name(&device.name)) {
            Err(ConflictError {
                entity: "Device",
                id: device.name,
            }
            .into())
        } else {
            store.push(device.clone());
            store.sort_by_key(|d| name_key(&d.name));
            Ok(device)
        };
        async { result }
    }

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|d| d.matches_name(name)).cloned();
        async { Ok(result) }
    }

    fn list_all(&self) -> impl Future<Output = Result<Vec<Device>, EcoHubError>> + Send {
        let result = self.store.lock().unwrap().clone();
        async { Ok(result) }
    }

    fn list_by_status(
        &self,
        is_on: bool,
    ) -> impl Future<Output = Result<Vec<Device>, EcoHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Device> = store.iter().filter(|d| d.is_on == is_on).cloned().collect();
        async { Ok(result) }
    }

    fn set_power(
        &self,
        name: &str,
        is_on: bool,
    ) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send {
        let result = self.update_with(name, |d| d.is_on = is_on);
        async { Ok(result) }
    }

    fn toggle(&self, name: &str) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send {
        let result = self.update_with(name, |d| d.is_on = !d.is_on);
        async { Ok(result) }
    }

    fn update_consumption(
        &self,
        name: &str,
        base_consumption: f64,
    ) -> impl Future<Output = Result<Option<Device>, EcoHubError>> + Send {
        let result = self.update_with(name, |d| d.base_consumption = base_consumption);
        async { Ok(result) }
    }

    fn remove(&self, name: &str) -> impl Future<Output = Result<bool, EcoHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|d| !d.matches_name(name));
        let removed = store.len() < before;
        async move { Ok(removed) }
    }

    fn power_off_all(&self) -> impl Future<Output = Result<u64, EcoHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let mut changed = 0;
        for device in store.iter_mut().filter(|d| d.is_on) {
            device.is_on = false;
            changed += 1;
        }
        async move { Ok(changed) }
    }

    fn total_on_consumption(&self) -> impl Future<Output = Result<f64, EcoHubError>> + Send {
        let store = self.store.lock().unwrap();
        let total: f64 = store.iter().map(Device::current_draw).sum();
        async move { Ok(total) }
    }

    fn count(&self) -> impl Future<Output = Result<u64, EcoHubError>> + Send {
        let count = self.store.lock().unwrap().len() as u64;
        async move { Ok(count) }
    }
}

#[derive(Default)]
pub struct InMemoryRecordRepo {
    store: Mutex<Vec<EnergyRecord>>,
}

impl EnergyRecordRepository for InMemoryRecordRepo {
    fn append(
        &self,
        record: EnergyRecord,
    ) -> impl Future<Output = Result<EnergyRecord, EcoHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.iter().any(|r| r.timestamp == record.timestamp) {
            Err(ConflictError {
                entity: "EnergyRecord",
                id: record.timestamp.to_string(),
            }
            .into())
        } else {
            store.push(record.clone());
            store.sort_by_key(|r| r.timestamp);
            Ok(record)
        };
        async { result }
    }

    fn latest(&self) -> impl Future<Output = Result<Option<EnergyRecord>, EcoHubError>> + Send {
        let result = self.store.lock().unwrap().last().cloned();
        async { Ok(result) }
    }

    fn recent_newest_first(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<EnergyRecord>, EcoHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<EnergyRecord> = store.iter().rev().take(limit as usize).cloned().collect();
        async { Ok(result) }
    }

    fn recent_chronological(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<EnergyRecord>, EcoHubError>> + Send {
        let store = self.store.lock().unwrap();
        let skip = store.len().saturating_sub(limit as usize);
        let result: Vec<EnergyRecord> = store.iter().skip(skip).cloned().collect();
        async { Ok(result) }
    }
}

/// Clock returning a fixed context, or nothing when "unreachable".
pub struct FixedClock {
    pub context: Mutex<Option<TimeContext>>,
}

impl FixedClock {
    pub fn at(hour: i64, day: i64, weekend: i64) -> Self {
        Self {
            context: Mutex::new(Some(TimeContext::new(hour, day, weekend).unwrap())),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            context: Mutex::new(None),
        }
    }
}

impl TimeContextProvider for FixedClock {
    fn context(&self) -> impl Future<Output = Option<TimeContext>> + Send {
        let context = *self.context.lock().unwrap();
        async move { context }
    }
}

pub struct StubActuator {
    pub reachable: AtomicBool,
    pub calls: AtomicUsize,
}

impl StubActuator {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Actuator for StubActuator {
    fn shutdown_all(&self) -> impl Future<Output = Result<(), EcoHubError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(UnavailableError {
                service: "Actuator",
                reason: "connection refused".to_string(),
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

/// Predictor answering a fixed value, or failing when `None`.
pub struct StubPredictor(pub Option<f64>);

impl Predictor for StubPredictor {
    fn predict(
        &self,
        _context: TimeContext,
    ) -> impl Future<Output = Result<f64, EcoHubError>> + Send {
        let result = self.0.ok_or_else(|| {
            UnavailableError {
                service: "Predictor",
                reason: "timed out".to_string(),
            }
            .into()
        });
        async { result }
    }
}

pub enum TestAdapters {}

impl Adapters for TestAdapters {
    type Devices = InMemoryDeviceRepo;
    type Records = InMemoryRecordRepo;
    type Clock = FixedClock;
    type Actuator = StubActuator;
    type Predictor = StubPredictor;
}

/// Builder for a hub wired to in-memory doubles.
pub struct TestHub {
    pub clock: FixedClock,
    pub actuator: StubActuator,
    pub predictor: Option<StubPredictor>,
    pub threshold: f64,
}

impl Default for TestHub {
    fn default() -> Self {
        Self {
            clock: FixedClock::at(8, 2, 0),
            actuator: StubActuator::new(true),
            predictor: None,
            threshold: Threshold::DEFAULT,
        }
    }
}

impl TestHub {
    pub fn build(self) -> Arc<Hub<TestAdapters>> {
        Arc::new(Hub::new(
            InMemoryDeviceRepo::default(),
            InMemoryRecordRepo::default(),
            self.clock,
            self.actuator,
            self.predictor,
            Threshold::new(self.threshold).unwrap(),
        ))
    }

    pub async fn seeded(self) -> Arc<Hub<TestAdapters>> {
        let hub = self.build();
        hub.devices.seed_defaults().await.unwrap();
        hub
    }
}
