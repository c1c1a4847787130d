//! Derived reachability snapshot of the collaborators.

use serde::{Deserialize, Serialize};

/// Connection state of an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    Connected,
    Disconnected,
}

impl From<bool> for Link {
    fn from(reachable: bool) -> Self {
        if reachable {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

/// Where the most recent prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorMode {
    External,
    Fallback,
}

/// Facade lifecycle; only ever `running` while it can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacadeState {
    Running,
}

/// Computed on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub time_context: Link,
    pub actuator: Link,
    pub predictor: PredictorMode,
    pub storage: Link,
    pub facade: FacadeState,
}
