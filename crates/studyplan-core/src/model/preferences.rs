//! Scheduling policy for a whole planning run.
//!
//! Defaults are applied once when the record is built or deserialized;
//! the planner never falls back to ad-hoc values further down.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::subject::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Nightly sleep window in fractional clock hours. May wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepSchedule {
    pub start: f64,
    pub end: f64,
}

impl SleepSchedule {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the window; `23 -> 7` is 8 hours.
    pub fn duration_hours(&self) -> f64 {
        if self.start > self.end {
            (24.0 - self.start) + self.end
        } else {
            self.end - self.start
        }
    }
}

impl Default for SleepSchedule {
    fn default() -> Self {
        Self::new(23.0, 7.0)
    }
}

/// Pomodoro cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

impl PomodoroSettings {
    /// Share of wall-clock time lost to short breaks, `break / focus`.
    ///
    /// Zero when focus length is zero.
    pub fn break_overhead(&self) -> f64 {
        if self.focus_minutes == 0 {
            return 0.0;
        }
        self.break_minutes as f64 / self.focus_minutes as f64
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

/// Named part of the day a learner prefers to study in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[serde(alias = "Early Morning (5-8 AM)", alias = "Early Morning")]
    EarlyMorning,
    #[serde(alias = "Morning (8-12 PM)", alias = "Morning")]
    Morning,
    #[serde(alias = "Afternoon (12-5 PM)", alias = "Afternoon")]
    Afternoon,
    #[serde(alias = "Evening (5-9 PM)", alias = "Evening")]
    Evening,
    #[serde(alias = "Night (9 PM+)", alias = "Night")]
    Night,
}

impl TimeOfDay {
    /// Clock hours covered by this part of the day.
    pub fn hours(self) -> &'static [u8] {
        match self {
            TimeOfDay::EarlyMorning => &[5, 6, 7],
            TimeOfDay::Morning => &[8, 9, 10, 11],
            TimeOfDay::Afternoon => &[12, 13, 14, 15, 16],
            TimeOfDay::Evening => &[17, 18, 19, 20],
            TimeOfDay::Night => &[21, 22, 23],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "Early Morning (5-8 AM)",
            TimeOfDay::Morning => "Morning (8-12 PM)",
            TimeOfDay::Afternoon => "Afternoon (12-5 PM)",
            TimeOfDay::Evening => "Evening (5-9 PM)",
            TimeOfDay::Night => "Night (9 PM+)",
        }
    }
}

/// Scheduling preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_sleep")]
    pub sleep: Option<SleepSchedule>,
    #[serde(default = "default_pomodoro")]
    pub pomodoro: Option<PomodoroSettings>,
    /// Per-subject difficulty (1-5), keyed by subject name.
    #[serde(default)]
    pub subject_difficulty: HashMap<String, u8>,
    #[serde(default = "default_min_session_minutes")]
    pub min_session_minutes: u32,
    #[serde(default = "default_max_session_minutes")]
    pub max_session_minutes: u32,
    #[serde(default)]
    pub preferred_times: Vec<TimeOfDay>,
}

/// Start hour used when no preferred time of day is configured.
pub const DEFAULT_START_HOUR: u8 = 8;

impl Preferences {
    pub fn min_session_hours(&self) -> f64 {
        self.min_session_minutes as f64 / 60.0
    }

    pub fn max_session_hours(&self) -> f64 {
        self.max_session_minutes as f64 / 60.0
    }

    /// Difficulty for `name`: explicit preference, then `fallback`, then 3.
    /// The result is clamped into 1..=5.
    pub fn difficulty_for(&self, name: &str, fallback: Option<u8>) -> u8 {
        self.subject_difficulty
            .get(name)
            .copied()
            .or(fallback)
            .unwrap_or(DEFAULT_DIFFICULTY)
            .clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    /// Flattened, ascending, de-duplicated clock hours of all preferred
    /// parts of the day. Empty when none are configured.
    pub fn preferred_hours(&self) -> Vec<u8> {
        let mut hours: Vec<u8> = self
            .preferred_times
            .iter()
            .flat_map(|t| t.hours().iter().copied())
            .collect();
        hours.sort_unstable();
        hours.dedup();
        hours
    }

    /// Advisory start hour for the `index`-th session of a day.
    pub fn preferred_start_hour(&self, index: usize) -> u8 {
        preferred_start_hour_in(&self.preferred_hours(), index)
    }
}

/// Start hour for the `index`-th session of a day, cycling through
/// `hours`. Falls back to [`DEFAULT_START_HOUR`] when `hours` is empty.
pub fn preferred_start_hour_in(hours: &[u8], index: usize) -> u8 {
    if hours.is_empty() {
        return DEFAULT_START_HOUR;
    }
    hours[index % hours.len()]
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sleep: default_sleep(),
            pomodoro: default_pomodoro(),
            subject_difficulty: HashMap::new(),
            min_session_minutes: default_min_session_minutes(),
            max_session_minutes: default_max_session_minutes(),
            preferred_times: Vec::new(),
        }
    }
}

// Default functions
fn default_sleep() -> Option<SleepSchedule> {
    Some(SleepSchedule::default())
}
fn default_pomodoro() -> Option<PomodoroSettings> {
    Some(PomodoroSettings::default())
}
fn default_min_session_minutes() -> u32 {
    30
}
fn default_max_session_minutes() -> u32 {
    120
}
fn default_focus_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
