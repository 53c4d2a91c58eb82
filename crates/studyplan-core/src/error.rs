//! Core error types for studyplan-core.
//!
//! Planning itself never fails; these errors come from loading plan
//! requests, validating caller input and reading or writing configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Unsupported input file format
    #[error("Unsupported input format for {path}: expected .toml or .json")]
    UnsupportedFormat { path: PathBuf },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The data directory could not be created
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Caller-input validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Two subjects share a name
    #[error("Duplicate subject name: {0}")]
    DuplicateSubject(String),

    /// Exam date is today or earlier
    #[error("Exam for '{subject}' on {exam_date} is not after {today}")]
    ExamNotInFuture {
        subject: String,
        exam_date: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },

    /// Invalid clock range
    #[error("Invalid time range for '{name}': end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        name: String,
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
