//! Study plan engines.
//!
//! The advanced engine walks every day from today up to the last exam:
//! - Computes the day's study capacity from sleep, the weekly grid,
//!   commitments and Pomodoro overhead
//! - Weighs active subjects by urgency, difficulty and catch-up deficit
//! - Splits the capacity across subjects under session-length limits
//! - Carries each subject's allocated hours forward to the next day
//!
//! Engines are pure: identical requests and `today` give identical plans.

mod allocator;
mod ledger;
mod plan;
mod urgency;
mod weighting;

pub use allocator::DailyAllocator;
pub use ledger::{plan_subjects, planning_days, AllocationLedger, PlannedSubject};
pub use plan::{AllocatedSession, StudyPlan, SubjectSummary, SubjectTarget, PLAN_DATE_FORMAT};
pub use urgency::UrgencyPlanner;
pub use weighting::{subject_weight, DayWeights, SubjectWeight, WeightingConfig, WeightingEngine};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::capacity::CapacityCalculator;
use crate::request::PlanRequest;

/// Days with this much capacity or less are skipped.
pub const MIN_DAILY_CAPACITY_HOURS: f64 = 0.5;

/// A planning engine. Alternative engines (for example a remote service)
/// produce the same [`StudyPlan`] shape behind this trait.
pub trait PlanEngine {
    /// Short identifier used in configuration and logs.
    fn name(&self) -> &'static str;

    /// Build a plan for `request`, starting on `today`.
    fn generate(&self, request: &PlanRequest, today: NaiveDate) -> StudyPlan;
}

/// Engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Advanced,
    Urgency,
}

impl EngineKind {
    pub fn engine(self) -> Box<dyn PlanEngine> {
        match self {
            EngineKind::Advanced => Box::new(AdvancedPlanner::new()),
            EngineKind::Urgency => Box::new(UrgencyPlanner::new()),
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "advanced" => Ok(EngineKind::Advanced),
            "urgency" | "basic" => Ok(EngineKind::Urgency),
            other => Err(format!("unknown engine: {other}")),
        }
    }
}

/// Why a day received no sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Capacity at or below [`MIN_DAILY_CAPACITY_HOURS`].
    InsufficientCapacity,
    /// Every exam is on or before this day.
    NoActiveSubjects,
    /// Every active subject has met its hour target.
    NoRemainingNeed,
    /// Weighted subjects existed but none fit a minimum-length session.
    NoViableSessions,
}

/// Result of planning one day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Skipped(SkipReason),
    Allocated(Vec<AllocatedSession>),
}

/// Capacity-aware, difficulty-weighted planner.
pub struct AdvancedPlanner {
    weighting: WeightingEngine,
}

impl AdvancedPlanner {
    /// Create a planner with default weighting constants
    pub fn new() -> Self {
        Self {
            weighting: WeightingEngine::new(),
        }
    }

    /// Create with custom weighting constants
    pub fn with_config(config: WeightingConfig) -> Self {
        Self {
            weighting: WeightingEngine::with_config(config),
        }
    }

    /// Resolve subject targets and bind the request for day-by-day planning.
    pub fn prepare<'a>(&'a self, request: &'a PlanRequest, today: NaiveDate) -> PlanRun<'a> {
        let subjects = plan_subjects(
            &request.subjects,
            &request.preferences,
            request.study_hours_per_day,
            today,
        );
        PlanRun {
            today,
            total_days: planning_days(&request.subjects, today),
            subjects,
            capacity: CapacityCalculator::new(
                &request.calendar,
                &request.commitments,
                &request.preferences,
            ),
            allocator: DailyAllocator::new(&request.preferences),
            weighting: &self.weighting,
        }
    }
}

impl Default for AdvancedPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanEngine for AdvancedPlanner {
    fn name(&self) -> &'static str {
        "advanced"
    }

    #[instrument(skip_all, fields(engine = "advanced", subjects = request.subjects.len(), today = %today))]
    fn generate(&self, request: &PlanRequest, today: NaiveDate) -> StudyPlan {
        if request.subjects.is_empty() {
            warn!("no subjects provided");
            return StudyPlan::new();
        }
        self.prepare(request, today).run()
    }
}

/// One planning run: resolved subjects plus the inputs needed per day.
pub struct PlanRun<'a> {
    today: NaiveDate,
    total_days: i64,
    subjects: Vec<PlannedSubject>,
    capacity: CapacityCalculator<'a>,
    allocator: DailyAllocator<'a>,
    weighting: &'a WeightingEngine,
}

impl<'a> PlanRun<'a> {
    pub fn subjects(&self) -> &[PlannedSubject] {
        &self.subjects
    }

    pub fn total_days(&self) -> i64 {
        self.total_days
    }

    /// Every date in the horizon, today first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.total_days).map(move |d| self.today + Duration::days(d))
    }

    /// Plan a single day, recording allocated hours in `ledger`.
    pub fn plan_day(&self, date: NaiveDate, ledger: &mut AllocationLedger) -> DayOutcome {
        let available = self.capacity.available_hours(date);
        debug!(%date, available = format_args!("{available:.2}"), "day capacity");

        if available <= MIN_DAILY_CAPACITY_HOURS {
            debug!(%date, "skipping day, insufficient time");
            return DayOutcome::Skipped(SkipReason::InsufficientCapacity);
        }

        if !self.subjects.iter().any(|s| s.is_active_on(date)) {
            debug!(%date, "no upcoming exams");
            return DayOutcome::Skipped(SkipReason::NoActiveSubjects);
        }

        let weights = self.weighting.weigh(date, &self.subjects, ledger);
        if weights.is_empty() {
            debug!(%date, "every active subject has met its target");
            return DayOutcome::Skipped(SkipReason::NoRemainingNeed);
        }

        let sessions = self.allocator.allocate(date, available, &weights, ledger);
        if sessions.is_empty() {
            return DayOutcome::Skipped(SkipReason::NoViableSessions);
        }
        DayOutcome::Allocated(sessions)
    }

    /// Plan every day of the horizon in order, threading one ledger through.
    pub fn run(&self) -> StudyPlan {
        info!(
            days = self.total_days,
            subjects = self.subjects.len(),
            "planning until last exam"
        );

        let targets = self
            .subjects
            .iter()
            .map(|s| SubjectTarget {
                subject: s.name.clone(),
                total_hours_needed: s.total_hours_needed,
            })
            .collect();

        let (_, plan) = self.dates().fold(
            (AllocationLedger::new(), StudyPlan::with_targets(targets)),
            |(mut ledger, mut plan), date| {
                if let DayOutcome::Allocated(sessions) = self.plan_day(date, &mut ledger) {
                    plan.insert_day(date, sessions);
                }
                (ledger, plan)
            },
        );

        for s in plan.summary() {
            info!(
                subject = %s.subject,
                allocated = format_args!("{:.1}", s.allocated_hours),
                target = format_args!("{:.1}", s.target_hours.unwrap_or_default()),
                percent = format_args!("{:.1}", s.percent.unwrap_or_default()),
                "allocation summary"
            );
        }
        plan
    }
}
