use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;
/// Neutral midpoint of the difficulty scale.
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// One exam the learner is preparing for.
///
/// `exam_date` is date-only; no session is ever placed on or after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub exam_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
}

impl Subject {
    pub fn new(name: impl Into<String>, exam_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            exam_date,
            difficulty: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Whole days from `date` until the exam (negative once it has passed).
    pub fn days_until_exam(&self, date: NaiveDate) -> i64 {
        (self.exam_date - date).num_days()
    }

    /// A subject is active on `date` while its exam is strictly later.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.days_until_exam(date) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_until_the_day_before_the_exam() {
        let exam = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let subject = Subject::new("Algebra", exam);
        assert!(subject.is_active_on(exam.pred_opt().unwrap()));
        assert!(!subject.is_active_on(exam));
        assert!(!subject.is_active_on(exam.succ_opt().unwrap()));
    }

    #[test]
    fn subject_deserializes_without_difficulty() {
        let json = r#"{"name":"Chemistry","exam_date":"2026-05-02"}"#;
        let subject: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.difficulty, None);
        let eve = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert_eq!(subject.days_until_exam(eve), 1);
    }
}
