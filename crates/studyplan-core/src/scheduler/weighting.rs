//! Daily subject priority weights.
//!
//! A subject's weight on a given day is the product of four factors:
//! - Urgency: `1 / sqrt(days_left)`, sub-linear so weights stay bounded
//!   as an exam approaches
//! - Difficulty: `difficulty / 3`, where 3 is neutral
//! - Progress deficit: `max(0.5, 1 - allocated / target)`
//! - Hours remaining: `sqrt(target - allocated)`
//!
//! Subjects with less than a quarter hour of remaining need get no weight
//! and take no further part in that day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ledger::{AllocationLedger, PlannedSubject};

/// Tunable constants of the weighting formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightingConfig {
    /// Remaining need below which a subject is considered done.
    pub min_remaining_hours: f64,
    /// Floor of the progress-deficit factor.
    pub min_progress_factor: f64,
    /// Difficulty that maps to a multiplier of 1.0.
    pub neutral_difficulty: f64,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            min_remaining_hours: 0.25,
            min_progress_factor: 0.5,
            neutral_difficulty: 3.0,
        }
    }
}

/// Weight of one active subject on one day.
#[derive(Debug, Clone, Copy)]
pub struct SubjectWeight<'a> {
    pub subject: &'a PlannedSubject,
    pub weight: f64,
    pub days_left: i64,
    pub hours_remaining: f64,
}

/// All positive weights of a day and their sum.
#[derive(Debug, Clone, Default)]
pub struct DayWeights<'a> {
    pub entries: Vec<SubjectWeight<'a>>,
    pub total: f64,
}

impl<'a> DayWeights<'a> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() || self.total <= 0.0
    }

    /// Entries ordered by weight, highest first. Equal weights keep their
    /// exam-date order.
    pub fn ranked(&self) -> Vec<SubjectWeight<'a>> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        ranked
    }
}

/// Weight calculator for active subjects.
pub struct WeightingEngine {
    config: WeightingConfig,
}

impl WeightingEngine {
    /// Create with default constants
    pub fn new() -> Self {
        Self {
            config: WeightingConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: WeightingConfig) -> Self {
        Self { config }
    }

    /// Weight for a subject with the given standing, or `0.0` when its
    /// remaining need is under the threshold.
    pub fn weight(&self, days_left: i64, difficulty: u8, allocated: f64, total_needed: f64) -> f64 {
        let hours_remaining = (total_needed - allocated).max(0.0);
        if hours_remaining < self.config.min_remaining_hours {
            return 0.0;
        }

        let urgency = 1.0 / (days_left.max(1) as f64).sqrt();
        let difficulty_multiplier = difficulty as f64 / self.config.neutral_difficulty;
        let progress_ratio = allocated / total_needed;
        let progress_deficit = (1.0 - progress_ratio).max(self.config.min_progress_factor);
        let hours_weight = hours_remaining.sqrt();

        urgency * difficulty_multiplier * progress_deficit * hours_weight
    }

    /// Weigh every subject active on `date`.
    pub fn weigh<'a>(
        &self,
        date: NaiveDate,
        subjects: &'a [PlannedSubject],
        ledger: &AllocationLedger,
    ) -> DayWeights<'a> {
        let mut weights = DayWeights::default();

        for subject in subjects.iter().filter(|s| s.is_active_on(date)) {
            let allocated = ledger.allocated(&subject.name);
            let days_left = subject.days_until_exam(date).max(1);
            let weight = self.weight(
                days_left,
                subject.difficulty,
                allocated,
                subject.total_hours_needed,
            );
            if weight <= 0.0 {
                continue;
            }

            let hours_remaining = ledger.remaining(subject);
            debug!(
                %date,
                subject = %subject.name,
                weight = format_args!("{weight:.3}"),
                days_left,
                difficulty = subject.difficulty,
                remaining = format_args!("{hours_remaining:.1}"),
                "subject weight"
            );

            weights.total += weight;
            weights.entries.push(SubjectWeight {
                subject,
                weight,
                days_left,
                hours_remaining,
            });
        }

        weights
    }
}

impl Default for WeightingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function using default constants
pub fn subject_weight(days_left: i64, difficulty: u8, allocated: f64, total_needed: f64) -> f64 {
    WeightingEngine::new().weight(days_left, difficulty, allocated, total_needed)
}
