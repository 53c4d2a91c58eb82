//! Plan output: sessions grouped by date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::duration::StudyDuration;

/// Date key format of a serialized plan, e.g. `19-October-2026`.
pub const PLAN_DATE_FORMAT: &str = "%d-%B-%Y";

/// One study session: a subject, a day and a duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedSession {
    pub subject: String,
    pub date: NaiveDate,
    /// Duration in decimal hours. The advanced engine stores the snapped
    /// value, the urgency engine the raw share.
    pub hours: f64,
    pub time: StudyDuration,
    pub time_formatted: String,
    pub difficulty: u8,
    pub days_until_exam: i64,
    pub exam_date: NaiveDate,
    /// Advisory; sessions of a day are not checked for overlap.
    pub preferred_start_hour: u8,
}

/// Hour target for one subject, recorded by the engine that built a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectTarget {
    pub subject: String,
    pub total_hours_needed: f64,
}

/// Per-subject totals across a whole plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub allocated_hours: f64,
    pub target_hours: Option<f64>,
    /// Allocated share of the target, in percent.
    pub percent: Option<f64>,
    pub sessions: usize,
}

/// Sessions keyed by date in chronological order.
///
/// A date is present only with at least one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyPlan {
    days: BTreeMap<NaiveDate, Vec<AllocatedSession>>,
    targets: Vec<SubjectTarget>,
}

impl StudyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets(targets: Vec<SubjectTarget>) -> Self {
        Self {
            days: BTreeMap::new(),
            targets,
        }
    }

    /// Record a day's sessions. An empty list leaves the plan unchanged.
    pub fn insert_day(&mut self, date: NaiveDate, sessions: Vec<AllocatedSession>) {
        if sessions.is_empty() {
            return;
        }
        self.days.insert(date, sessions);
    }

    pub fn day(&self, date: NaiveDate) -> Option<&[AllocatedSession]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<AllocatedSession>)> {
        self.days.iter()
    }

    pub fn sessions(&self) -> impl Iterator<Item = &AllocatedSession> {
        self.days.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total allocated hours for `subject` across all days.
    pub fn hours_for(&self, subject: &str) -> f64 {
        self.sessions()
            .filter(|s| s.subject == subject)
            .map(|s| s.hours)
            .sum()
    }

    /// Per-subject totals. Subjects with a recorded target come first in
    /// target order, followed by any others in order of first appearance.
    pub fn summary(&self) -> Vec<SubjectSummary> {
        let mut names: Vec<&str> = self.targets.iter().map(|t| t.subject.as_str()).collect();
        for session in self.sessions() {
            if !names.contains(&session.subject.as_str()) {
                names.push(&session.subject);
            }
        }

        names
            .into_iter()
            .map(|name| {
                let allocated_hours = self.hours_for(name);
                let target_hours = self
                    .targets
                    .iter()
                    .find(|t| t.subject == name)
                    .map(|t| t.total_hours_needed);
                let percent = target_hours
                    .filter(|&t| t > 0.0)
                    .map(|t| allocated_hours / t * 100.0);
                SubjectSummary {
                    subject: name.to_string(),
                    allocated_hours,
                    target_hours,
                    percent,
                    sessions: self.sessions().filter(|s| s.subject == name).count(),
                }
            })
            .collect()
    }
}

impl Serialize for StudyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (date, sessions) in &self.days {
            map.serialize_entry(&date.format(PLAN_DATE_FORMAT).to_string(), sessions)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(subject: &str, date: NaiveDate, minutes: u32) -> AllocatedSession {
        let time = StudyDuration {
            hours: minutes / 60,
            minutes: minutes % 60,
        };
        AllocatedSession {
            subject: subject.into(),
            date,
            hours: time.as_decimal_hours(),
            time,
            time_formatted: time.to_string(),
            difficulty: 3,
            days_until_exam: 4,
            exam_date: date + chrono::Duration::days(4),
            preferred_start_hour: 8,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn empty_days_are_never_stored() {
        let mut plan = StudyPlan::new();
        plan.insert_day(date(20), Vec::new());
        assert!(plan.is_empty());
        assert!(plan.day(date(20)).is_none());
    }

    #[test]
    fn serializes_chronologically_with_long_date_keys() {
        let mut plan = StudyPlan::new();
        plan.insert_day(date(21), vec![session("Math", date(21), 60)]);
        plan.insert_day(date(9), vec![session("Math", date(9), 90)]);

        let json = serde_json::to_string(&plan).unwrap();
        let first = json.find("09-October-2026").unwrap();
        let second = json.find("21-October-2026").unwrap();
        assert!(first < second);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["09-October-2026"][0]["time_formatted"], "1 hr 30 min");
        assert_eq!(value["09-October-2026"][0]["time"]["minutes"], 30);
    }

    #[test]
    fn summary_reports_progress_against_targets() {
        let mut plan = StudyPlan::with_targets(vec![
            SubjectTarget {
                subject: "Math".into(),
                total_hours_needed: 4.0,
            },
            SubjectTarget {
                subject: "Art".into(),
                total_hours_needed: 2.0,
            },
        ]);
        plan.insert_day(date(20), vec![session("Math", date(20), 120)]);
        plan.insert_day(date(21), vec![session("Math", date(21), 60)]);

        let summary = plan.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].subject, "Math");
        assert!((summary[0].allocated_hours - 3.0).abs() < 1e-9);
        assert!((summary[0].percent.unwrap() - 75.0).abs() < 1e-9);
        assert_eq!(summary[0].sessions, 2);
        assert_eq!(summary[1].allocated_hours, 0.0);
        assert_eq!(summary[1].sessions, 0);
    }
}
