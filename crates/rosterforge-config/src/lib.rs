//! Configuration system for RosterForge.
//!
//! Load solver configuration from TOML or YAML to control the time budget,
//! search limits and the global scheduling policy defaults without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use rosterforge_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [defaults.weekly]
//!     hard_min = 20
//!     soft_min = 30
//!     min_cost = 1
//!     soft_max = 40
//!     hard_max = 45
//!     max_cost = 1
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.defaults.weekly.soft_min, 30);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use rosterforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use rosterforge_core::BoundTuple;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time budget used when no termination is configured.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5);

/// Default per-day shift policy: `(3, 6, 1, 0, 10, 8)`.
pub const DEFAULT_SHIFT_BOUNDS: BoundTuple = BoundTuple::new(3, 6, 1, 0, 10, 8);

/// Default weekly hours policy: `(37, 0, 1, 38, 51, 1)`.
pub const DEFAULT_WEEKLY_BOUNDS: BoundTuple = BoundTuple::new(37, 0, 1, 38, 51, 1);

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Global policy defaults applied when no override is given.
    #[serde(default)]
    pub defaults: PolicyDefaults,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the wall-clock budget of a solve.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: None,
            millis_spent_limit: Some(limit.as_millis() as u64),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination time limit in seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            millis_spent_limit: None,
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Caps the number of search nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination = Some(TerminationConfig {
            node_limit: Some(nodes),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Replaces the global policy defaults.
    pub fn with_defaults(mut self, defaults: PolicyDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rosterforge_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     seconds_spent_limit = 2
    ///     millis_spent_limit = 500
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// The configured time limit, or [`DEFAULT_TIME_LIMIT`].
    pub fn effective_time_limit(&self) -> Duration {
        self.time_limit().unwrap_or(DEFAULT_TIME_LIMIT)
    }

    /// Returns the node limit, if configured.
    pub fn node_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_limit)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (scope, bounds) in [("shift", &self.defaults.shift), ("weekly", &self.defaults.weekly)] {
            if bounds.hard_min > bounds.hard_max {
                return Err(ConfigError::Invalid(format!(
                    "{} defaults have hard_min {} above hard_max {}",
                    scope, bounds.hard_min, bounds.hard_max
                )));
            }
            if bounds.min_cost < 0 || bounds.max_cost < 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} defaults have a negative penalty cost",
                    scope
                )));
            }
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Trust the backend's reported assignment.
    #[default]
    NonReproducible,

    /// Re-check every reported assignment against the model.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if solutions must be re-checked against the model.
    pub fn is_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Additional milliseconds to spend solving.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of search nodes.
    pub node_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis =
            self.seconds_spent_limit.unwrap_or(0) * 1000 + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Global fallbacks for the daily shift and weekly hour policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PolicyDefaults {
    /// Bounds on every contiguous shift within a day.
    #[serde(default = "default_shift_bounds")]
    pub shift: BoundTuple,

    /// Bounds on an employee's total hours across all days.
    #[serde(default = "default_weekly_bounds")]
    pub weekly: BoundTuple,
}

fn default_shift_bounds() -> BoundTuple {
    DEFAULT_SHIFT_BOUNDS
}

fn default_weekly_bounds() -> BoundTuple {
    DEFAULT_WEEKLY_BOUNDS
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            shift: DEFAULT_SHIFT_BOUNDS,
            weekly: DEFAULT_WEEKLY_BOUNDS,
        }
    }
}

impl PolicyDefaults {
    pub fn new(shift: BoundTuple, weekly: BoundTuple) -> Self {
        Self { shift, weekly }
    }
}

#[cfg(test)]
mod tests;
