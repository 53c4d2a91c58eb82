//! TOML-based application configuration.
//!
//! Stores user defaults for planning runs:
//! - Scheduling preferences (sleep window, Pomodoro cadence, session
//!   limits, preferred times of day, per-subject difficulty)
//! - Study hours per day
//! - Default planning engine
//!
//! Configuration is stored at `~/.config/studyplan/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::model::Preferences;
use crate::request::DEFAULT_STUDY_HOURS_PER_DAY;
use crate::scheduler::EngineKind;

/// Planner defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub engine: EngineKind,
    #[serde(default = "default_study_hours_per_day")]
    pub study_hours_per_day: f64,
}

fn default_study_hours_per_day() -> f64 {
    DEFAULT_STUDY_HOURS_PER_DAY
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            study_hours_per_day: default_study_hours_per_day(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_)
                    | serde_json::Value::Array(_)
                    | serde_json::Value::Null => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the defaults
    /// cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            CoreError::Config(ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The change is in memory
    /// only; call [`Config::save`] to persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails; the error is logged.
    pub fn load_or_default() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                warn!(error = %e, "failed to locate config, using defaults");
                Self::default()
            }
        }
    }

    /// Like [`Config::load_from`], but logs a warning and falls back to
    /// defaults when the file cannot be read or parsed.
    pub fn load_from_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load config, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeOfDay;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.engine").as_deref(), Some("advanced"));
        assert_eq!(cfg.get("preferences.min_session_minutes").as_deref(), Some("30"));
        assert_eq!(cfg.get("preferences.pomodoro.focus_minutes").as_deref(), Some("25"));
        assert!(cfg.get("preferences.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("preferences.max_session_minutes", "90").unwrap();
        assert_eq!(cfg.preferences.max_session_minutes, 90);
        cfg.set("planner.study_hours_per_day", "4.5").unwrap();
        assert_eq!(cfg.planner.study_hours_per_day, 4.5);
    }

    #[test]
    fn set_updates_engine_and_lists() {
        let mut cfg = Config::default();
        cfg.set("planner.engine", "urgency").unwrap();
        assert_eq!(cfg.planner.engine, EngineKind::Urgency);

        cfg.set("preferences.preferred_times", r#"["morning","evening"]"#)
            .unwrap();
        assert_eq!(
            cfg.preferences.preferred_times,
            vec![TimeOfDay::Morning, TimeOfDay::Evening]
        );
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("preferences.nonexistent", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("preferences.min_session_minutes", "lots").is_err());
        assert!(cfg.set("planner.engine", "quantum").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_reload_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.preferences.subject_difficulty.insert("Physics".into(), 5);
        cfg.set("preferences.sleep.start", "22.5").unwrap();
        cfg.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.preferences.subject_difficulty.get("Physics"), Some(&5));
        assert_eq!(reloaded.preferences.sleep.unwrap().start, 22.5);
    }

    #[test]
    fn malformed_file_is_an_error_and_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[planner\nengine = \"advanced\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CoreError::TomlDe(_))));
        assert_eq!(Config::load_from_or_default(&path), Config::default());
        // The broken file is left in place for the user to fix.
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("[planner"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[planner]\nstudy_hours_per_day = 3.0\n").unwrap();
        assert_eq!(cfg.planner.study_hours_per_day, 3.0);
        assert_eq!(cfg.planner.engine, EngineKind::Advanced);
        assert_eq!(cfg.preferences, Preferences::default());
    }
}
