//! # ecohub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository`: the device registry
//!   - `EnergyRecordRepository`: append-only consumption history
//!   - `TimeContextProvider`: hour, day and weekend flag of "now"
//!   - `Actuator`: remote "shut everything off" command
//!   - `Predictor`: external consumption predictor
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   the notification feed and the threshold cell
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService`, `EnergyService`
//!   - `PredictionAdapter`: external predictor with a local fallback
//!   - `ControlLoop`: the periodic sample/evaluate/act job
//!   - `EnergyFacade`: the single business-logic layer behind every
//!     request surface
//!
//! ## Dependency rule
//! Depends on `ecohub-domain` only (plus `tokio` for timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod control_loop;
pub mod facade;
pub mod hub;
pub mod notification_feed;
pub mod ports;
pub mod prediction_adapter;
pub mod services;
pub mod threshold_cell;

#[cfg(test)]
pub(crate) mod testing;
