//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod actuator;
pub mod predictor;
pub mod storage;
pub mod time_context;

pub use actuator::Actuator;
pub use predictor::Predictor;
pub use storage::{DeviceRepository, EnergyRecordRepository};
pub use time_context::TimeContextProvider;

/// Bundle of concrete adapter types a running hub is built from.
///
/// Lets the services, the control loop, and the transports stay generic over
/// a single parameter instead of one per port.
pub trait Adapters: Send + Sync + 'static {
    type Devices: DeviceRepository + Send + Sync + 'static;
    type Records: EnergyRecordRepository + Send + Sync + 'static;
    type Clock: TimeContextProvider + Send + Sync + 'static;
    type Actuator: Actuator + Send + Sync + 'static;
    type Predictor: Predictor + Send + Sync + 'static;
}
