//! Study durations snapped to a 5-minute grid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Granularity of every emitted session length, in minutes.
pub const GRID_MINUTES: u32 = 5;

/// A whole-minute duration whose minute part is always a multiple of
/// [`GRID_MINUTES`] and below 60.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StudyDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl StudyDuration {
    /// Snap fractional hours to the nearest 5 minutes (halves round up).
    ///
    /// Negative and non-finite inputs yield a zero duration.
    pub fn from_decimal_hours(decimal_hours: f64) -> Self {
        Self::from_total_minutes(Self::raw_minutes(decimal_hours), |m| {
            (m + GRID_MINUTES / 2) / GRID_MINUTES
        })
    }

    /// Snap fractional hours down to the 5-minute grid.
    pub fn floor_decimal_hours(decimal_hours: f64) -> Self {
        Self::from_total_minutes(Self::raw_minutes(decimal_hours), |m| m / GRID_MINUTES)
    }

    fn raw_minutes(decimal_hours: f64) -> u32 {
        if !decimal_hours.is_finite() || decimal_hours <= 0.0 {
            return 0;
        }
        (decimal_hours * 60.0).round().min(u32::MAX as f64) as u32
    }

    fn from_total_minutes(total: u32, slots: impl Fn(u32) -> u32) -> Self {
        let snapped = slots(total).saturating_mul(GRID_MINUTES);
        Self {
            hours: snapped / 60,
            minutes: snapped % 60,
        }
    }

    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }

    pub fn as_decimal_hours(&self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}

impl fmt::Display for StudyDuration {
    /// `"2 hr 30 min"`, `"2 hr"`, `"45 min"` or `"0 min"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hours, self.minutes) {
            (0, 0) => write!(f, "0 min"),
            (h, 0) => write!(f, "{h} hr"),
            (0, m) => write!(f, "{m} min"),
            (h, m) => write!(f, "{h} hr {m} min"),
        }
    }
}
