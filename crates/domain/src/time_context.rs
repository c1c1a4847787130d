//! Time context: the calendar features the predictor works on.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hour of day, ISO day of week (1 = Monday … 7 = Sunday) and weekend flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeContext {
    pub hour: u8,
    pub day_of_week: u8,
    pub is_weekend: bool,
}

impl TimeContext {
    /// Validate raw integers as received from a request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `hour` is outside `0..=23`, `day`
    /// outside `1..=7`, or `weekend` is not `0` or `1`.
    pub fn new(hour: i64, day: i64, weekend: i64) -> Result<Self, ValidationError> {
        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or(ValidationError::HourOutOfRange(hour))?;
        let day_of_week = u8::try_from(day)
            .ok()
            .filter(|d| (1..=7).contains(d))
            .ok_or(ValidationError::DayOutOfRange(day))?;
        let is_weekend = match weekend {
            0 => false,
            1 => true,
            other => return Err(ValidationError::WeekendOutOfRange(other)),
        };
        Ok(Self {
            hour,
            day_of_week,
            is_weekend,
        })
    }

    /// Derive the context from a wall-clock instant.
    ///
    /// Saturday and Sunday are the weekend.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let day_of_week = u8::try_from(instant.weekday().number_from_monday()).unwrap_or(1);
        let hour = u8::try_from(instant.hour()).unwrap_or(0);
        Self {
            hour,
            day_of_week,
            is_weekend: day_of_week >= 6,
        }
    }

    /// The weekend flag as the `0`/`1` integer external predictors expect.
    #[must_use]
    pub fn weekend_flag(&self) -> u8 {
        u8::from(self.is_weekend)
    }
}

/// Result of asking the time-context provider, as reported to callers.
///
/// An unreachable provider is not an error for request surfaces: they report
/// `available: false` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeContextReading {
    pub available: bool,
    pub context: Option<TimeContext>,
}

impl From<Option<TimeContext>> for TimeContextReading {
    fn from(context: Option<TimeContext>) -> Self {
        Self {
            available: context.is_some(),
            context,
        }
    }
}
