//! Device: a named household consumer with a base consumption and a power flag.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{Timestamp, now};

/// Devices installed when the registry is empty at start-up.
///
/// `(name, base_consumption, is_on)`
pub const DEFAULT_DEVICES: [(&str, f64, bool); 5] = [
    ("Heating System", 25.0, true),
    ("Air Conditioner", 30.0, false),
    ("Water Heater", 15.0, true),
    ("Lighting Grid", 10.0, true),
    ("Entertainment System", 5.0, false),
];

/// A household consumer tracked by the registry.
///
/// `name` is the identity: it is unique across the registry once folded with
/// [`name_key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub base_consumption: f64,
    pub is_on: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is blank, or
    /// [`ValidationError::InvalidConsumption`] when the base consumption is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        validate_consumption(self.base_consumption)
    }

    /// Whether `name` designates this device.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }

    /// Power draw this device contributes to the meter right now.
    #[must_use]
    pub fn current_draw(&self) -> f64 {
        if self.is_on { self.base_consumption } else { 0.0 }
    }
}

/// Key under which a device name is unique: trimmed and Unicode lowercased.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check that a consumption figure is finite and non-negative.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidConsumption`] otherwise.
pub fn validate_consumption(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidConsumption(value))
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    name: Option<String>,
    base_consumption: Option<f64>,
    is_on: bool,
}

impl DeviceBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn base_consumption(mut self, value: f64) -> Self {
        self.base_consumption = Some(value);
        self
    }

    #[must_use]
    pub fn is_on(mut self, is_on: bool) -> Self {
        self.is_on = is_on;
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// The name is trimmed. Both timestamps are set to now.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is missing or blank, or the
    /// base consumption is negative.
    pub fn build(self) -> Result<Device, ValidationError> {
        let created_at = now();
        let device = Device {
            name: self.name.unwrap_or_default().trim().to_string(),
            base_consumption: self.base_consumption.unwrap_or_default(),
            is_on: self.is_on,
            created_at,
            updated_at: created_at,
        };
        device.validate()?;
        Ok(device)
    }
}

/// Snapshot of a set of devices, as returned by list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<Device>,
    pub total_count: usize,
}

impl From<Vec<Device>> for DeviceList {
    fn from(devices: Vec<Device>) -> Self {
        Self {
            total_count: devices.len(),
            devices,
        }
    }
}
