//! Plan requests: the complete input of one planning run.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::model::{
    Commitment, Preferences, Subject, WeeklyCalendar, MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// Study hours per day used when neither the request nor the config sets one.
pub const DEFAULT_STUDY_HOURS_PER_DAY: f64 = 6.0;

/// Fully resolved planning input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub calendar: WeeklyCalendar,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default = "default_study_hours_per_day")]
    pub study_hours_per_day: f64,
}

fn default_study_hours_per_day() -> f64 {
    DEFAULT_STUDY_HOURS_PER_DAY
}

impl PlanRequest {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self {
            subjects,
            calendar: WeeklyCalendar::new(),
            commitments: Vec::new(),
            preferences: Preferences::default(),
            study_hours_per_day: DEFAULT_STUDY_HOURS_PER_DAY,
        }
    }

    /// Check the caller-side input contract.
    ///
    /// Planning does not require this to pass; it is for callers that want
    /// to reject bad input before planning.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.subjects.is_empty() {
            return Err(ValidationError::EmptyCollection("subjects".into()));
        }

        let mut seen = HashSet::new();
        for subject in &self.subjects {
            if subject.name.trim().is_empty() {
                return Err(ValidationError::invalid(
                    "subjects.name",
                    "must not be empty",
                ));
            }
            if !seen.insert(subject.name.as_str()) {
                return Err(ValidationError::DuplicateSubject(subject.name.clone()));
            }
            if subject.exam_date <= today {
                return Err(ValidationError::ExamNotInFuture {
                    subject: subject.name.clone(),
                    exam_date: subject.exam_date,
                    today,
                });
            }
            if let Some(d) = subject.difficulty {
                check_difficulty(&format!("subjects.{}.difficulty", subject.name), d)?;
            }
        }

        if !(self.study_hours_per_day > 0.0 && self.study_hours_per_day <= 24.0) {
            return Err(ValidationError::invalid(
                "study_hours_per_day",
                format!("{} is not within (0, 24]", self.study_hours_per_day),
            ));
        }

        for block in self.calendar.blocks() {
            if block.hour > 23 {
                return Err(ValidationError::invalid(
                    "calendar.hour",
                    format!("{} on {} is not within 0..=23", block.hour, block.weekday),
                ));
            }
        }

        for c in &self.commitments {
            if c.days.is_empty() {
                return Err(ValidationError::invalid(
                    format!("commitments.{}.days", c.name),
                    "must name at least one day",
                ));
            }
            if c.end <= c.start {
                return Err(ValidationError::InvalidTimeRange {
                    name: c.name.clone(),
                    start: c.start,
                    end: c.end,
                });
            }
        }

        validate_preferences(&self.preferences)
    }
}

fn check_difficulty(field: &str, difficulty: u8) -> Result<(), ValidationError> {
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(ValidationError::invalid(
            field,
            format!("{difficulty} is not within {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"),
        ));
    }
    Ok(())
}

fn validate_preferences(prefs: &Preferences) -> Result<(), ValidationError> {
    if let Some(sleep) = prefs.sleep {
        for (field, hour) in [("sleep.start", sleep.start), ("sleep.end", sleep.end)] {
            if !(0.0..24.0).contains(&hour) {
                return Err(ValidationError::invalid(
                    field,
                    format!("{hour} is not within 0..24"),
                ));
            }
        }
    }

    if let Some(pomodoro) = prefs.pomodoro {
        if pomodoro.focus_minutes == 0 {
            return Err(ValidationError::invalid(
                "pomodoro.focus_minutes",
                "must be positive",
            ));
        }
    }

    for (name, &d) in &prefs.subject_difficulty {
        check_difficulty(&format!("subject_difficulty.{name}"), d)?;
    }

    if prefs.min_session_minutes == 0 {
        return Err(ValidationError::invalid(
            "min_session_minutes",
            "must be positive",
        ));
    }
    if prefs.min_session_minutes > prefs.max_session_minutes {
        return Err(ValidationError::invalid(
            "min_session_minutes",
            format!(
                "{} exceeds max_session_minutes ({})",
                prefs.min_session_minutes, prefs.max_session_minutes
            ),
        ));
    }
    Ok(())
}

/// On-disk request. Preferences and hours per day are optional and fall
/// back to the caller's defaults, usually the user's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFile {
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub calendar: WeeklyCalendar,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub study_hours_per_day: Option<f64>,
}

impl RequestFile {
    /// Read a `.toml` or `.json` request file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has another extension,
    /// or does not parse.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(toml::from_str(&content)?),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(CoreError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Fill missing sections from defaults.
    pub fn into_request(self, preferences: &Preferences, study_hours_per_day: f64) -> PlanRequest {
        PlanRequest {
            subjects: self.subjects,
            calendar: self.calendar,
            commitments: self.commitments,
            preferences: self.preferences.unwrap_or_else(|| preferences.clone()),
            study_hours_per_day: self.study_hours_per_day.unwrap_or(study_hours_per_day),
        }
    }
}
