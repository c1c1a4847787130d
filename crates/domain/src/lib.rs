//! # ecohub-domain
//!
//! Pure domain model for the ecohub energy monitor.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Devices** (named consumers with a base consumption and a power flag)
//! - Define **Energy records** (one consumption sample per control-loop tick)
//! - Define **Notifications** (operator-visible events)
//! - Define the **Threshold** and the **time context** the predictor works on
//! - Hold the deterministic fallback prediction model
//! - Define the result shapes shared by every request surface
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod device;
pub mod energy_record;
pub mod notification;
pub mod operation;
pub mod prediction;
pub mod service_status;
pub mod threshold;
pub mod time_context;
