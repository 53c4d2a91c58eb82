//! Planning inputs: subjects, the weekly calendar, commitments and preferences.

mod calendar;
mod preferences;
mod subject;

pub use calendar::{BlockType, CalendarBlock, Commitment, SlotKey, WeeklyCalendar};
pub use preferences::{
    preferred_start_hour_in, PomodoroSettings, Preferences, SleepSchedule, TimeOfDay,
    DEFAULT_START_HOUR,
};
pub use subject::{Subject, DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY};
