//! Control loop: the periodic sample, evaluate, act job.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use ecohub_domain::energy_record::EnergyRecord;
use ecohub_domain::notification::NotificationKind;
use ecohub_domain::time::now_millis;

use crate::hub::Hub;
use crate::ports::{Actuator, Adapters, TimeContextProvider};

/// Source recorded on notifications raised by the loop.
pub const CONTROL_LOOP_SOURCE: &str = "Control Loop";

/// Tunables of the control loop.
#[derive(Debug, Clone)]
pub struct ControlLoopConfig {
    /// Period between the start of two ticks.
    pub interval: Duration,
    /// Amplitude of the symmetric uniform noise added to the measured
    /// consumption. `0` disables it.
    pub jitter: f64,
    /// Fixed seed for the noise generator; random when `None`.
    pub seed: Option<u64>,
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            jitter: 2.0,
            seed: None,
        }
    }
}

/// Observable phase of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Sampling,
    Evaluating,
    Acting,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The time context was unreachable; nothing was recorded.
    Skipped,
    /// A storage failure ended the tick early.
    Aborted,
    /// A record within the threshold was appended.
    Recorded(EnergyRecord),
    /// An elevated record was appended and the shutdown path ran.
    Acted {
        record: EnergyRecord,
        /// Whether the actuator accepted the command and devices were
        /// switched off.
        actuated: bool,
    },
}

/// Periodic monitoring job.
///
/// Ticks are single-flight: a tick that outlives the period delays the next
/// one instead of overlapping with it.
pub struct ControlLoop<A: Adapters> {
    hub: Arc<Hub<A>>,
    config: ControlLoopConfig,
    rng: Mutex<StdRng>,
    state: Mutex<LoopState>,
    last_timestamp: AtomicI64,
    resumed: AtomicBool,
}

impl<A: Adapters> ControlLoop<A> {
    pub fn new(hub: Arc<Hub<A>>, config: ControlLoopConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            hub,
            config,
            rng: Mutex::new(rng),
            state: Mutex::new(LoopState::Idle),
            last_timestamp: AtomicI64::new(0),
            resumed: AtomicBool::new(false),
        }
    }

    fn state_guard(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LoopState) {
        *self.state_guard() = state;
    }

    /// Current phase.
    pub fn state(&self) -> LoopState {
        *self.state_guard()
    }

    fn jitter(&self) -> f64 {
        let amplitude = self.config.jitter;
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(-amplitude..=amplitude)
    }

    /// Raise the timestamp floor to the newest stored record, so samples
    /// written after a restart sort after the existing history. Retried on
    /// the next tick if the store cannot be read.
    async fn resume_from_history(&self) {
        if self.resumed.load(Ordering::SeqCst) {
            return;
        }
        match self.hub.energy.latest().await {
            Ok(latest) => {
                if let Some(record) = latest {
                    self.last_timestamp.fetch_max(record.timestamp, Ordering::SeqCst);
                    tracing::debug!(timestamp = record.timestamp, "resuming after stored history");
                }
                self.resumed.store(true, Ordering::SeqCst);
            }
            Err(err) => {
                tracing::warn!(error = %err.describe(), "failed to read latest energy record");
            }
        }
    }

    /// Epoch milliseconds, bumped past the previous record's timestamp.
    fn next_timestamp(&self) -> i64 {
        let now = now_millis();
        let previous = self
            .last_timestamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(previous + 1)
    }

    /// Run one sample, evaluate, act cycle.
    pub async fn tick(&self) -> TickOutcome {
        self.set_state(LoopState::Sampling);
        let outcome = self.run_tick().await;
        self.set_state(LoopState::Idle);
        outcome
    }

    async fn run_tick(&self) -> TickOutcome {
        let Some(context) = self.hub.time_context.context().await else {
            tracing::debug!("time context unavailable, skipping tick");
            return TickOutcome::Skipped;
        };
        let total = match self.hub.devices.total_consumption().await {
            Ok(total) => total,
            Err(err) => {
                tracing::error!(error = %err.describe(), "failed to read device consumption");
                return TickOutcome::Aborted;
            }
        };
        let actual = (total + self.jitter()).max(0.0);

        self.set_state(LoopState::Evaluating);
        self.resume_from_history().await;
        let predicted = self.hub.predictor.predict(context).await;
        let threshold = self.hub.threshold.get();
        let record =
            EnergyRecord::evaluate(self.next_timestamp(), context, actual, predicted, threshold);
        let record = match self.hub.energy.record(record).await {
            Ok(record) => record,
            Err(err) => {
                tracing::error!(error = %err.describe(), "failed to append energy record");
                return TickOutcome::Aborted;
            }
        };
        tracing::debug!(
            actual = record.actual_consumption,
            predicted = record.predicted_consumption,
            status = record.status.as_str(),
            "energy sample recorded"
        );

        if !record.is_elevated() {
            return TickOutcome::Recorded(record);
        }

        self.set_state(LoopState::Acting);
        self.hub.notifications.push(
            NotificationKind::Alert,
            format!(
                "High consumption detected: {:.1} kWh",
                record.actual_consumption
            ),
            CONTROL_LOOP_SOURCE,
        );
        let actuated = self.shut_down().await;
        TickOutcome::Acted { record, actuated }
    }

    async fn shut_down(&self) -> bool {
        if let Err(err) = self.hub.actuator.shutdown_all().await {
            tracing::warn!(error = %err.describe(), "actuator shutdown failed");
            return false;
        }
        match self.hub.devices.power_off_all().await {
            Ok(changed) => {
                tracing::info!(changed, "threshold exceeded, all devices switched off");
                true
            }
            Err(err) => {
                tracing::error!(error = %err.describe(), "failed to switch devices off");
                false
            }
        }
    }

    /// Drive ticks until `cancel` fires.
    ///
    /// An in-flight tick always completes before the loop returns.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            interval_ms = u64::try_from(self.config.interval.as_millis()).unwrap_or(u64::MAX),
            "control loop started"
        );

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("received shutdown signal, stopping control loop");
                    break;
                }
                _ = ticker.tick() => {
                    let outcome = self.tick().await;
                    tracing::trace!(?outcome, "tick complete");
                }
            }
        }
    }
}
