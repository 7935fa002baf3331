//! Arena configuration file.
//!
//! ```toml
//! [game]
//! default_time_limit = 5.0
//! poll_interval_ms = 1000
//!
//! [sandbox]
//! slack_ms = 1000
//! grace_ms = 500
//!
//! [[strategies]]
//! name = "edax"
//! program = "/usr/local/bin/edax-bridge"
//! args = ["--level", "10"]
//! env = { EDAX_BOOK = "/var/lib/edax/book.dat" }
//! ```
//!
//! Every section is optional. Entries under `[[strategies]]` are added to the
//! built-in strategies and replace a built-in of the same name.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::registry::{StrategyRegistry, HUMAN};
use crate::runner::RunnerOptions;
use crate::sandbox::{millis, LaunchSpec, SandboxOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub game: GameConfig,
    pub sandbox: SandboxOptions,
    pub strategies: Vec<StrategyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds per move when none is given on the command line
    pub default_time_limit: f64,
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_time_limit: 5.0,
            poll_interval: RunnerOptions::default().poll_interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub name: String,
    #[serde(flatten)]
    pub launch: LaunchSpec,
}

impl ArenaConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_from(&content, path)
    }

    /// Parse and validate configuration text that did not come from a file
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_from(content, Path::new("<inline>"))
    }

    fn parse_from(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_time_limit()?;
        if self.game.poll_interval.is_zero() {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }

        for entry in &self.strategies {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid("strategy name must not be empty".into()));
            }
            if entry.name == HUMAN {
                return Err(ConfigError::Invalid(format!("'{}' is a reserved name", HUMAN)));
            }
        }
        Ok(())
    }

    pub fn default_time_limit(&self) -> Result<Duration, ConfigError> {
        time_limit(self.game.default_time_limit)
            .map_err(|e| ConfigError::Invalid(format!("default_time_limit {}", e)))
    }

    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            poll_interval: self.game.poll_interval,
        }
    }

    /// Built-in strategies hosted by `host_exe`, plus configured entries
    pub fn registry(&self, host_exe: &Path) -> StrategyRegistry {
        let mut registry = StrategyRegistry::builtin(host_exe, self.sandbox.clone());
        for entry in &self.strategies {
            registry.insert(entry.name.clone(), entry.launch.clone());
        }
        registry
    }
}

/// Seconds per move as a `Duration`. Rejects anything that is not a positive
/// number of seconds a `Duration` can hold.
pub fn time_limit(seconds: f64) -> Result<Duration, String> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("must be a positive number of seconds, got {}", seconds));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("{} is out of range: {}", seconds, e))
}
