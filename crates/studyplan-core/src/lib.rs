//! # Studyplan Core Library
//!
//! This library turns a set of exams, a weekly busy/free calendar,
//! recurring commitments and study preferences into a day-by-day
//! allocation of study minutes per subject. The CLI binary is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Model**: subjects, weekly calendar grid, commitments and preferences
//! - **Capacity**: free study hours per day after sleep, calendar blocks,
//!   commitments and Pomodoro break overhead
//! - **Scheduler**: daily priority weights, proportional allocation under
//!   session-length limits, and the day-by-day plan driver
//! - **Storage**: TOML-based configuration of user defaults
//!
//! ## Key Components
//!
//! - [`AdvancedPlanner`]: capacity-aware, difficulty-weighted engine
//! - [`UrgencyPlanner`]: urgency-only engine
//! - [`PlanRequest`]: complete input of one planning run
//! - [`StudyPlan`]: sessions keyed by date
//! - [`Config`]: persisted user defaults

pub mod capacity;
pub mod duration;
pub mod error;
pub mod model;
pub mod request;
pub mod scheduler;
pub mod storage;

pub use capacity::{daily_capacity, CapacityBreakdown, CapacityCalculator};
pub use duration::StudyDuration;
pub use error::{ConfigError, CoreError, ValidationError};
pub use model::{
    BlockType, Commitment, PomodoroSettings, Preferences, SleepSchedule, Subject, TimeOfDay,
    WeeklyCalendar,
};
pub use request::{PlanRequest, RequestFile};
pub use scheduler::{
    AdvancedPlanner, AllocatedSession, DayOutcome, EngineKind, PlanEngine, SkipReason, StudyPlan,
    SubjectSummary, UrgencyPlanner,
};
pub use storage::Config;
