/*
[INPUT]:  YAML configuration file or in-code construction
[OUTPUT]: Validated session configuration
[POS]:    Configuration layer - interval durations and driver cadence
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration or count that must be positive was zero.
    #[error("invalid config: {field} must be positive")]
    InvalidConfig { field: &'static str },

    /// Reading the configuration file failed.
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing the YAML payload failed.
    #[error("parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Immutable session configuration, supplied once at construction.
///
/// Durations are whole seconds on the file surface. Validation runs once,
/// at engine construction; values are never re-checked afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Work interval length in seconds.
    pub pomodoro_secs: u64,
    /// Short break length in seconds.
    pub short_break_secs: u64,
    /// Long break length in seconds.
    pub long_break_secs: u64,
    /// Completed pomodoros before the long break.
    pub cycles_before_long_break: u32,
    /// Driver cadence in milliseconds. A display-smoothness knob, not a
    /// correctness-affecting constant.
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pomodoro_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            cycles_before_long_break: 4,
            tick_interval_ms: 250,
        }
    }
}

impl SessionConfig {
    /// Load configuration from a YAML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every duration and count is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("pomodoro_secs", self.pomodoro_secs),
            ("short_break_secs", self.short_break_secs),
            ("long_break_secs", self.long_break_secs),
            ("cycles_before_long_break", u64::from(self.cycles_before_long_break)),
            ("tick_interval_ms", self.tick_interval_ms),
        ];

        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidConfig { field });
            }
        }

        Ok(())
    }

    /// Work interval duration.
    pub fn pomodoro(&self) -> Duration {
        Duration::from_secs(self.pomodoro_secs)
    }

    /// Short break duration.
    pub fn short_break(&self) -> Duration {
        Duration::from_secs(self.short_break_secs)
    }

    /// Long break duration.
    pub fn long_break(&self) -> Duration {
        Duration::from_secs(self.long_break_secs)
    }

    /// Driver tick cadence.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SessionConfig::default();
        config.validate().expect("default config valid");
        assert_eq!(config.cycles_before_long_break, 4);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_zero_durations() {
        for field in [
            "pomodoro_secs",
            "short_break_secs",
            "long_break_secs",
            "tick_interval_ms",
        ] {
            let mut config = SessionConfig::default();
            match field {
                "pomodoro_secs" => config.pomodoro_secs = 0,
                "short_break_secs" => config.short_break_secs = 0,
                "long_break_secs" => config.long_break_secs = 0,
                "tick_interval_ms" => config.tick_interval_ms = 0,
                _ => unreachable!(),
            }

            let err = config.validate().expect_err("zero duration rejected");
            assert!(matches!(
                err,
                ConfigError::InvalidConfig { field: reported } if reported == field
            ));
        }
    }

    #[test]
    fn rejects_zero_cycle_count() {
        let config = SessionConfig {
            cycles_before_long_break: 0,
            ..SessionConfig::default()
        };

        let err = config.validate().expect_err("zero cycle count rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidConfig {
                field: "cycles_before_long_break"
            }
        ));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: SessionConfig =
            serde_yaml::from_str("pomodoro_secs: 1500\nshort_break_secs: 300\n")
                .expect("parse partial yaml");

        assert_eq!(config.pomodoro_secs, 1500);
        assert_eq!(config.short_break_secs, 300);
        assert_eq!(config.long_break_secs, 15 * 60);
        assert_eq!(config.cycles_before_long_break, 4);
    }
}
