//! Daily study capacity.
//!
//! Capacity for a day is what is left of 24 hours after sleep, occupied
//! cells of the weekly grid and commitments, discounted for Pomodoro
//! break overhead. Only the weekday of a date matters.
//!
//! Sleep cells placed in the weekly grid are charged on top of the sleep
//! window from [`Preferences::sleep`]. Callers must not describe the same
//! sleep in both places.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::{Commitment, Preferences, WeeklyCalendar};

const HOURS_PER_DAY: f64 = 24.0;

/// Intermediate terms of a capacity calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityBreakdown {
    pub weekday: Weekday,
    pub sleep_hours: f64,
    pub calendar_hours: f64,
    pub commitment_hours: f64,
    /// Hours lost to Pomodoro breaks.
    pub break_hours: f64,
    /// Final study capacity, never negative.
    pub available_hours: f64,
}

/// Computes per-day capacity from one set of planning inputs.
#[derive(Debug, Clone, Copy)]
pub struct CapacityCalculator<'a> {
    calendar: &'a WeeklyCalendar,
    commitments: &'a [Commitment],
    preferences: &'a Preferences,
}

impl<'a> CapacityCalculator<'a> {
    pub fn new(
        calendar: &'a WeeklyCalendar,
        commitments: &'a [Commitment],
        preferences: &'a Preferences,
    ) -> Self {
        Self {
            calendar,
            commitments,
            preferences,
        }
    }

    /// Study hours available on `date`.
    pub fn available_hours(&self, date: NaiveDate) -> f64 {
        self.breakdown(date.weekday()).available_hours
    }

    /// Full calculation for one weekday.
    pub fn breakdown(&self, weekday: Weekday) -> CapacityBreakdown {
        let sleep_hours = self
            .preferences
            .sleep
            .map(|s| s.duration_hours())
            .unwrap_or(0.0);

        // Each grid cell is a fixed one-hour unit regardless of its type.
        let calendar_hours = self.calendar.occupied_hours(weekday) as f64;

        let commitment_hours: f64 = self
            .commitments
            .iter()
            .filter(|c| c.occurs_on(weekday))
            .map(Commitment::duration_hours)
            .sum();

        let before_breaks =
            (HOURS_PER_DAY - sleep_hours - calendar_hours - commitment_hours).max(0.0);

        let after_breaks = match self.preferences.pomodoro {
            Some(pomodoro) if before_breaks > 0.0 => {
                (before_breaks * (1.0 - pomodoro.break_overhead())).max(0.0)
            }
            _ => before_breaks,
        };

        CapacityBreakdown {
            weekday,
            sleep_hours,
            calendar_hours,
            commitment_hours,
            break_hours: before_breaks - after_breaks,
            available_hours: after_breaks,
        }
    }

    /// Capacity for each weekday, Monday through Sunday.
    pub fn weekly(&self) -> Vec<CapacityBreakdown> {
        WEEK.iter().map(|&day| self.breakdown(day)).collect()
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Convenience function for a single date.
pub fn daily_capacity(
    date: NaiveDate,
    calendar: &WeeklyCalendar,
    commitments: &[Commitment],
    preferences: &Preferences,
) -> f64 {
    CapacityCalculator::new(calendar, commitments, preferences).available_hours(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockType, PomodoroSettings, SleepSchedule};
    use chrono::NaiveTime;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn no_pomodoro() -> Preferences {
        Preferences {
            pomodoro: None,
            ..Default::default()
        }
    }

    // 2026-10-19 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn sleep_only() {
        let prefs = no_pomodoro();
        let hours = daily_capacity(monday(), &WeeklyCalendar::new(), &[], &prefs);
        assert!((hours - 16.0).abs() < 1e-9);
    }

    #[test]
    fn default_pomodoro_discounts_a_fifth() {
        let prefs = Preferences::default();
        let hours = daily_capacity(monday(), &WeeklyCalendar::new(), &[], &prefs);
        assert!((hours - 12.8).abs() < 1e-9);
    }

    #[test]
    fn grid_cells_and_commitments_are_charged_on_matching_days() {
        let calendar = WeeklyCalendar::new()
            .with_block(Weekday::Mon, 9, BlockType::Class)
            .with_block(Weekday::Mon, 10, BlockType::Class)
            .with_block(Weekday::Mon, 11, BlockType::Free)
            .with_block(Weekday::Tue, 9, BlockType::Class);
        let commitments = vec![
            Commitment::new("Gym", vec![Weekday::Mon, Weekday::Wed], hm(18, 0), hm(19, 30)),
            Commitment::new("Job", vec![Weekday::Sat], hm(9, 0), hm(17, 0)),
        ];
        let prefs = no_pomodoro();
        let calc = CapacityCalculator::new(&calendar, &commitments, &prefs);

        let b = calc.breakdown(Weekday::Mon);
        assert_eq!(b.calendar_hours, 2.0);
        assert!((b.commitment_hours - 1.5).abs() < 1e-9);
        assert!((b.available_hours - 12.5).abs() < 1e-9);

        assert!((calc.breakdown(Weekday::Tue).available_hours - 15.0).abs() < 1e-9);
        assert!((calc.breakdown(Weekday::Sat).available_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn sleep_cells_in_grid_are_charged_on_top_of_sleep_window() {
        let calendar = WeeklyCalendar::new()
            .with_block(Weekday::Mon, 23, BlockType::Sleep)
            .with_block(Weekday::Mon, 0, BlockType::Sleep);
        let prefs = no_pomodoro();
        let hours = daily_capacity(monday(), &calendar, &[], &prefs);
        assert!((hours - 14.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_at_zero_when_overbooked() {
        let commitments = vec![Commitment::new(
            "Shift",
            vec![Weekday::Mon],
            hm(0, 0),
            hm(23, 59),
        )];
        let prefs = Preferences::default();
        let calendar = WeeklyCalendar::new();
        let calc = CapacityCalculator::new(&calendar, &commitments, &prefs);
        let b = calc.breakdown(Weekday::Mon);
        assert_eq!(b.available_hours, 0.0);
        assert_eq!(b.break_hours, 0.0);
    }

    #[test]
    fn breaks_longer_than_focus_leave_nothing() {
        let prefs = Preferences {
            sleep: Some(SleepSchedule::new(0.0, 8.0)),
            pomodoro: Some(PomodoroSettings {
                focus_minutes: 10,
                break_minutes: 20,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(daily_capacity(monday(), &WeeklyCalendar::new(), &[], &prefs), 0.0);
    }

    #[test]
    fn weekly_overview_starts_on_monday() {
        let prefs = no_pomodoro();
        let calendar = WeeklyCalendar::new().with_block(Weekday::Sun, 10, BlockType::Commitment);
        let week = CapacityCalculator::new(&calendar, &[], &prefs).weekly();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].weekday, Weekday::Mon);
        assert_eq!(week[6].weekday, Weekday::Sun);
        assert!((week[6].available_hours - 15.0).abs() < 1e-9);
    }
}
