//! Splits one day's capacity across weighted subjects.
//!
//! Subjects are served in descending weight order. Each gets its
//! proportional share of the day, clamped to the session-length limits,
//! then to its remaining need, then to what is left of the day. Earlier
//! subjects therefore get first claim on the day's time. A clamped share
//! below the minimum session length is dropped for the day.

use chrono::NaiveDate;
use tracing::debug;

use super::ledger::AllocationLedger;
use super::plan::AllocatedSession;
use super::weighting::DayWeights;
use crate::duration::StudyDuration;
use crate::model::{preferred_start_hour_in, Preferences};

/// Float tolerance for comparisons against the minimum session length.
const EPSILON: f64 = 1e-9;

/// Allocator for a single day.
pub struct DailyAllocator<'a> {
    preferences: &'a Preferences,
    preferred_hours: Vec<u8>,
}

impl<'a> DailyAllocator<'a> {
    pub fn new(preferences: &'a Preferences) -> Self {
        Self {
            preferences,
            preferred_hours: preferences.preferred_hours(),
        }
    }

    /// Allocate `available_hours` on `date` and record every emitted
    /// session in `ledger`.
    ///
    /// The returned sessions are in weight order. The sum of their hours
    /// never exceeds `available_hours`.
    pub fn allocate(
        &self,
        date: NaiveDate,
        available_hours: f64,
        weights: &DayWeights<'_>,
        ledger: &mut AllocationLedger,
    ) -> Vec<AllocatedSession> {
        let mut sessions = Vec::new();
        if weights.is_empty() || available_hours <= 0.0 {
            return sessions;
        }

        let min_hours = self.preferences.min_session_hours();
        let max_hours = self.preferences.max_session_hours();
        let mut remaining_day = available_hours;

        for (index, entry) in weights.ranked().into_iter().enumerate() {
            let subject = entry.subject;
            let share = available_hours * (entry.weight / weights.total);

            let hours = share
                .min(max_hours)
                .max(min_hours)
                .min(entry.hours_remaining)
                .min(remaining_day);

            if hours + EPSILON < min_hours || hours <= 0.0 {
                debug!(%date, subject = %subject.name, hours, "below minimum session, dropped");
                continue;
            }

            let mut time = StudyDuration::from_decimal_hours(hours);
            if time.as_decimal_hours() > remaining_day + EPSILON {
                time = StudyDuration::floor_decimal_hours(remaining_day);
            }
            let decimal_hours = time.as_decimal_hours();
            if time.is_zero() || decimal_hours + EPSILON < min_hours {
                debug!(%date, subject = %subject.name, "no room on the 5-minute grid, dropped");
                continue;
            }

            let preferred_start_hour = preferred_start_hour_in(&self.preferred_hours, index);
            ledger.record(&subject.name, decimal_hours);
            remaining_day -= decimal_hours;

            debug!(
                %date,
                subject = %subject.name,
                duration = %time,
                start = preferred_start_hour,
                total = format_args!("{:.1}", ledger.allocated(&subject.name)),
                "allocated"
            );

            sessions.push(AllocatedSession {
                subject: subject.name.clone(),
                date,
                hours: decimal_hours,
                time,
                time_formatted: time.to_string(),
                difficulty: subject.difficulty,
                days_until_exam: entry.days_left,
                exam_date: subject.exam_date,
                preferred_start_hour,
            });
        }

        sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeOfDay;
    use crate::scheduler::ledger::PlannedSubject;
    use crate::scheduler::weighting::SubjectWeight;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap() + chrono::Duration::days(offset)
    }

    fn subject(name: &str, target: f64) -> PlannedSubject {
        PlannedSubject {
            name: name.into(),
            exam_date: day(7),
            difficulty: 3,
            total_hours_needed: target,
        }
    }

    fn weights<'a>(entries: &[(&'a PlannedSubject, f64)]) -> DayWeights<'a> {
        let mut w = DayWeights::default();
        for &(subject, weight) in entries {
            w.total += weight;
            w.entries.push(SubjectWeight {
                subject,
                weight,
                days_left: 7,
                hours_remaining: subject.total_hours_needed,
            });
        }
        w
    }

    #[test]
    fn shares_are_clamped_to_max_session() {
        let a = subject("A", 50.0);
        let b = subject("B", 50.0);
        let prefs = Preferences::default();
        let mut ledger = AllocationLedger::new();

        let day_weights = weights(&[(&a, 1.0), (&b, 1.0)]);
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), 10.0, &day_weights, &mut ledger);

        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.hours == 2.0));
        assert_eq!(ledger.allocated("A"), 2.0);
        assert_eq!(sessions[0].time_formatted, "2 hr");
    }

    #[test]
    fn small_share_is_raised_to_min_session() {
        let a = subject("A", 50.0);
        let b = subject("B", 50.0);
        let prefs = Preferences::default();
        let mut ledger = AllocationLedger::new();

        let day_weights = weights(&[(&a, 19.0), (&b, 1.0)]);
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), 4.0, &day_weights, &mut ledger);

        assert_eq!(sessions[0].subject, "A");
        assert_eq!(sessions[0].hours, 2.0);
        assert_eq!(sessions[1].subject, "B");
        assert_eq!(sessions[1].time.total_minutes(), 30);
    }

    #[test]
    fn sub_minimum_remainder_of_the_day_is_omitted_not_truncated() {
        let a = subject("A", 50.0);
        let b = subject("B", 50.0);
        let prefs = Preferences::default();
        let mut ledger = AllocationLedger::new();

        // A takes its 2h maximum, leaving 20 minutes for B.
        let available = 2.0 + 20.0 / 60.0;
        let day_weights = weights(&[(&a, 9.0), (&b, 1.0)]);
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), available, &day_weights, &mut ledger);

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].subject, "A");
        assert_eq!(ledger.allocated("B"), 0.0);
    }

    #[test]
    fn share_is_capped_by_remaining_need() {
        let a = subject("A", 0.75);
        let prefs = Preferences::default();
        let mut ledger = AllocationLedger::new();

        let day_weights = weights(&[(&a, 1.0)]);
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), 8.0, &day_weights, &mut ledger);

        assert_eq!(sessions[0].time.total_minutes(), 45);
        assert_eq!(ledger.remaining(&a), 0.0);
    }

    #[test]
    fn session_uses_the_day_snapshot_of_its_weight_entry() {
        let a = subject("A", 50.0);
        let prefs = Preferences::default();
        let mut ledger = AllocationLedger::new();

        let mut day_weights = weights(&[(&a, 1.0)]);
        day_weights.entries[0].hours_remaining = 0.5;
        day_weights.entries[0].days_left = 3;
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), 8.0, &day_weights, &mut ledger);

        assert_eq!(sessions[0].time.total_minutes(), 30);
        assert_eq!(sessions[0].days_until_exam, 3);
    }

    #[test]
    fn rounding_never_overruns_the_day() {
        let a = subject("A", 50.0);
        let prefs = Preferences {
            min_session_minutes: 10,
            ..Default::default()
        };
        let mut ledger = AllocationLedger::new();

        // 58 minutes would snap up to 60.
        let available = 58.0 / 60.0;
        let day_weights = weights(&[(&a, 1.0)]);
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), available, &day_weights, &mut ledger);

        assert_eq!(sessions[0].time.total_minutes(), 55);
        assert!(sessions[0].hours <= available);
    }

    #[test]
    fn start_hours_follow_weight_rank() {
        let a = subject("A", 50.0);
        let b = subject("B", 50.0);
        let c = subject("C", 50.0);
        let prefs = Preferences {
            preferred_times: vec![TimeOfDay::Night],
            ..Default::default()
        };
        let mut ledger = AllocationLedger::new();

        let day_weights = weights(&[(&c, 1.0), (&a, 3.0), (&b, 2.0)]);
        let allocator = DailyAllocator::new(&prefs);
        let sessions = allocator.allocate(day(0), 6.0, &day_weights, &mut ledger);

        let starts: Vec<(&str, u8)> = sessions
            .iter()
            .map(|s| (s.subject.as_str(), s.preferred_start_hour))
            .collect();
        assert_eq!(starts, vec![("A", 21), ("B", 22), ("C", 23)]);
        assert_eq!(sessions[0].days_until_exam, 7);
    }
}
