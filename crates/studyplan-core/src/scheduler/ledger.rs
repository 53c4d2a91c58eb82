//! Per-run subject state: static hour targets and the running tally of
//! allocated hours.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Preferences, Subject};

/// A subject with its difficulty resolved and its hour target fixed for
/// the whole planning horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSubject {
    pub name: String,
    pub exam_date: NaiveDate,
    pub difficulty: u8,
    pub total_hours_needed: f64,
}

impl PlannedSubject {
    pub fn days_until_exam(&self, date: NaiveDate) -> i64 {
        (self.exam_date - date).num_days()
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.days_until_exam(date) > 0
    }
}

/// Number of days from `today` until the last exam, at least one.
pub fn planning_days(subjects: &[Subject], today: NaiveDate) -> i64 {
    let last_exam = subjects
        .iter()
        .map(|s| s.exam_date)
        .fold(today, |latest, d| latest.max(d));
    (last_exam - today).num_days().max(1)
}

/// Resolve difficulties and split `study_hours_per_day × planning_days`
/// across subjects in proportion to difficulty.
///
/// The result is ordered by exam date, earliest first; ties keep input order.
pub fn plan_subjects(
    subjects: &[Subject],
    preferences: &Preferences,
    study_hours_per_day: f64,
    today: NaiveDate,
) -> Vec<PlannedSubject> {
    let total_available = study_hours_per_day * planning_days(subjects, today) as f64;

    let difficulties: Vec<u8> = subjects
        .iter()
        .map(|s| preferences.difficulty_for(&s.name, s.difficulty))
        .collect();
    let difficulty_sum: u32 = difficulties.iter().map(|&d| d as u32).sum();

    let mut planned: Vec<PlannedSubject> = subjects
        .iter()
        .zip(difficulties)
        .map(|(s, difficulty)| PlannedSubject {
            name: s.name.clone(),
            exam_date: s.exam_date,
            difficulty,
            total_hours_needed: if difficulty_sum == 0 {
                0.0
            } else {
                difficulty as f64 / difficulty_sum as f64 * total_available
            },
        })
        .collect();
    planned.sort_by_key(|s| s.exam_date);
    planned
}

/// Cumulative hours allocated per subject. Owned by the plan driver and
/// lent mutably to the allocator for one day at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationLedger {
    allocated: HashMap<String, f64>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocated(&self, subject: &str) -> f64 {
        self.allocated.get(subject).copied().unwrap_or(0.0)
    }

    /// Hours still needed to reach the subject's target, never negative.
    pub fn remaining(&self, subject: &PlannedSubject) -> f64 {
        (subject.total_hours_needed - self.allocated(&subject.name)).max(0.0)
    }

    pub fn record(&mut self, subject: &str, hours: f64) {
        *self.allocated.entry(subject.to_string()).or_insert(0.0) += hours;
    }
}
