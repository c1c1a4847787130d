//! # ecohub-adapter-virtual
//!
//! Local implementations of the two external capabilities the hub talks to.
//!
//! | Capability | Type | Behaviour |
//! |------------|------|-----------|
//! | Time context | [`LocalClock`] | Reads the host clock in local time |
//! | Actuator | [`VirtualActuator`] | Logs the shutdown command and counts it; can be marked unreachable |
//!
//! ## Dependency rule
//!
//! Depends on `ecohub-app` (port traits) and `ecohub-domain` only.

mod actuator;
mod clock;

pub use actuator::VirtualActuator;
pub use clock::LocalClock;
