//! Planner configuration, persisted as TOML.
//!
//! Every field has a serde default equal to the baseline ruleset, so an empty
//! or partial file is valid. The default location follows XDG:
//! `$XDG_CONFIG_HOME/wakewindow/config.toml`, falling back to
//! `~/.config/wakewindow/config.toml`.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assess::Ruleset;
use crate::schedule::ScheduleSettings;

/// Errors from configuration loading and validation.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(wakewindow::config::no_home),
        help("Set the HOME environment variable or pass --config explicitly.")
    )]
    NoHome,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(wakewindow::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(wakewindow::config::parse),
        help("Check the TOML syntax. Unknown keys are ignored; all keys are optional.")
    )]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(wakewindow::config::invalid),
        help(
            "adjustment_step_minutes must be positive and quick_sleep_minutes \
             must not exceed slow_to_sleep_minutes."
        )
    )]
    Invalid { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Everything tunable about the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub rules: Ruleset,
    #[serde(default)]
    pub schedule: ScheduleSettings,
}

impl PlannerConfig {
    /// Parse from a TOML string. `origin` is only used in error messages.
    pub fn from_toml(toml_str: &str, origin: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content, &path.display().to_string())?;
        tracing::info!(path = %path.display(), "loaded planner config");
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the default location.
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = default_config_path()?;
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            tracing::debug!(path = %default_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rules.adjustment_step_minutes == 0 {
            return Err(ConfigError::Invalid {
                message: "adjustment_step_minutes must be > 0".into(),
            });
        }
        if self.rules.adjustment_step_minutes > i32::MAX as u32 {
            return Err(ConfigError::Invalid {
                message: "adjustment_step_minutes is too large".into(),
            });
        }
        if self.rules.quick_sleep_minutes > self.rules.slow_to_sleep_minutes {
            return Err(ConfigError::Invalid {
                message: format!(
                    "quick_sleep_minutes ({}) exceeds slow_to_sleep_minutes ({})",
                    self.rules.quick_sleep_minutes, self.rules.slow_to_sleep_minutes
                ),
            });
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
    }
}

/// `$XDG_CONFIG_HOME/wakewindow/config.toml`, or `~/.config/wakewindow/config.toml`.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let config_dir = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .map_err(|_| ConfigError::NoHome)?,
    };
    Ok(config_dir.join("wakewindow").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_baseline() {
        let config = PlannerConfig::default();
        assert_eq!(config.rules.adjustment_step_minutes, 15);
        assert_eq!(config.rules.slow_to_sleep_minutes, 20);
        assert_eq!(config.rules.quick_sleep_minutes, 15);
        assert_eq!(config.rules.short_nap_minutes, 60);
        assert_eq!(config.schedule.first_nap_minutes, 90);
        assert_eq!(config.schedule.later_nap_minutes, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = PlannerConfig::from_toml("", "test").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = PlannerConfig::from_toml(
            "[rules]\nadjustment_step_minutes = 10\n\n[schedule]\nlater_nap_minutes = 45\n",
            "test",
        )
        .unwrap();
        assert_eq!(config.rules.adjustment_step_minutes, 10);
        assert_eq!(config.rules.slow_to_sleep_minutes, 20);
        assert_eq!(config.schedule.first_nap_minutes, 90);
        assert_eq!(config.schedule.later_nap_minutes, 45);
    }

    #[test]
    fn toml_round_trip() {
        let config = PlannerConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(PlannerConfig::from_toml(&text, "test").unwrap(), config);
    }

    #[test]
    fn rejects_zero_step() {
        let err = PlannerConfig::from_toml("[rules]\nadjustment_step_minutes = 0\n", "test")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = PlannerConfig::from_toml(
            "[rules]\nquick_sleep_minutes = 30\nslow_to_sleep_minutes = 20\n",
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_bad_syntax() {
        let err = PlannerConfig::from_toml("[rules\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "inline"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nfirst_nap_minutes = 120\n").unwrap();
        let config = PlannerConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.schedule.first_nap_minutes, 120);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            PlannerConfig::load_or_default(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        // Env vars are not mutated here (unsafe in edition 2024).
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("wakewindow/config.toml"));
        }
    }
}
