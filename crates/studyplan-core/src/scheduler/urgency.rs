//! Urgency-only planner.
//!
//! Splits a fixed number of hours per day across active subjects in
//! proportion to `1 / days_left`. Ignores capacity, session limits and
//! hour targets.

use chrono::{Duration, NaiveDate};
use tracing::{instrument, warn};

use super::ledger::planning_days;
use super::plan::{AllocatedSession, StudyPlan};
use super::PlanEngine;
use crate::duration::StudyDuration;
use crate::request::PlanRequest;

#[derive(Debug, Default)]
pub struct UrgencyPlanner;

impl UrgencyPlanner {
    pub fn new() -> Self {
        Self
    }
}

impl PlanEngine for UrgencyPlanner {
    fn name(&self) -> &'static str {
        "urgency"
    }

    #[instrument(skip_all, fields(engine = "urgency", subjects = request.subjects.len(), today = %today))]
    fn generate(&self, request: &PlanRequest, today: NaiveDate) -> StudyPlan {
        let mut plan = StudyPlan::new();
        if request.subjects.is_empty() {
            warn!("no subjects provided");
            return plan;
        }

        let prefs = &request.preferences;
        for offset in 0..planning_days(&request.subjects, today) {
            let date = today + Duration::days(offset);

            let active: Vec<(&crate::model::Subject, i64)> = request
                .subjects
                .iter()
                .filter(|s| s.is_active_on(date))
                .map(|s| (s, s.days_until_exam(date)))
                .collect();
            let total_weight: f64 = active.iter().map(|(_, days)| 1.0 / *days as f64).sum();

            let sessions = active
                .iter()
                .enumerate()
                .map(|(index, (subject, days_left))| {
                    let hours =
                        request.study_hours_per_day * (1.0 / *days_left as f64) / total_weight;
                    let time = StudyDuration::from_decimal_hours(hours);
                    AllocatedSession {
                        subject: subject.name.clone(),
                        date,
                        hours,
                        time,
                        time_formatted: time.to_string(),
                        difficulty: prefs.difficulty_for(&subject.name, subject.difficulty),
                        days_until_exam: *days_left,
                        exam_date: subject.exam_date,
                        preferred_start_hour: prefs.preferred_start_hour(index),
                    }
                })
                .collect();
            plan.insert_day(date, sessions);
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Preferences, Subject, WeeklyCalendar};

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap() + Duration::days(offset)
    }

    fn request(subjects: Vec<Subject>) -> PlanRequest {
        PlanRequest {
            subjects,
            calendar: WeeklyCalendar::new(),
            commitments: Vec::new(),
            preferences: Preferences::default(),
            study_hours_per_day: 6.0,
        }
    }

    #[test]
    fn splits_daily_hours_by_inverse_days_left() {
        let req = request(vec![Subject::new("Near", day(2)), Subject::new("Far", day(4))]);
        let plan = UrgencyPlanner::new().generate(&req, day(0));

        // weights 1/2 and 1/4 -> 4h and 2h
        let first = plan.day(day(0)).unwrap();
        assert!((first[0].hours - 4.0).abs() < 1e-9);
        assert!((first[1].hours - 2.0).abs() < 1e-9);
        assert_eq!(first[1].time_formatted, "2 hr");

        // Day 2 only "Far" remains and gets everything.
        let third = plan.day(day(2)).unwrap();
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].subject, "Far");
        assert!((third[0].hours - 6.0).abs() < 1e-9);

        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn nothing_to_plan_without_future_exams() {
        let plan = UrgencyPlanner::new().generate(&request(vec![Subject::new("Old", day(-1))]), day(0));
        assert!(plan.is_empty());
        assert!(UrgencyPlanner::new().generate(&request(Vec::new()), day(0)).is_empty());
    }
}
