//! Configuration system for ShiftForge.
//!
//! Load solver configuration from TOML or YAML to control the time budget,
//! branching orderings and search stages without code changes.
//!
//! # Examples
//!
//! ```
//! use shiftforge_config::{SolverConfig, ValueOrdering, VariableOrdering};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     time_limit_millis = 2500
//!     variable_ordering = "min_domain_lowest_min"
//!     value_ordering = "prefer_one"
//!
//!     [[phases]]
//!     [phases.select]
//!     type = "days"
//!     days = [0, 1]
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_millis(2500));
//! assert_eq!(config.variable_ordering, VariableOrdering::MinDomainLowestMin);
//! assert_eq!(config.value_ordering, ValueOrdering::PreferOne);
//! assert_eq!(config.phases.len(), 1);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use shiftforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("shiftforge.toml").unwrap_or_default();
//! assert_eq!(config.time_limit_millis, 10_000);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shiftforge_core::{Comparison, ShiftForgeError};
use thiserror::Error;

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

impl From<ConfigError> for ShiftForgeError {
    fn from(err: ConfigError) -> Self {
        ShiftForgeError::Config(err.to_string())
    }
}

fn default_time_limit_millis() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Wall-clock budget for one solve call.
    #[serde(default = "default_time_limit_millis", alias = "timeLimitMillis")]
    pub time_limit_millis: u64,

    /// Default variable ordering for stages that do not override it.
    #[serde(default, alias = "variableOrdering")]
    pub variable_ordering: VariableOrdering,

    /// Default value ordering for stages that do not override it.
    #[serde(default, alias = "valueOrdering")]
    pub value_ordering: ValueOrdering,

    /// Seed for [`VariableOrdering::Random`]; `None` draws from the OS.
    #[serde(default, alias = "randomSeed")]
    pub random_seed: Option<u64>,

    /// Branch-and-bound cut on partial cost.
    #[serde(default = "default_true", alias = "enablePruning")]
    pub enable_pruning: bool,

    /// Ordered variable-ordering stages.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,

    /// Comparison used by min-non-working rules that leave it unset.
    #[serde(default, alias = "minNonWorkingViolation")]
    pub min_non_working_violation: Comparison,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_millis: default_time_limit_millis(),
            variable_ordering: VariableOrdering::default(),
            value_ordering: ValueOrdering::default(),
            random_seed: None,
            enable_pruning: true,
            phases: Vec::new(),
            min_non_working_violation: Comparison::default(),
        }
    }
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

    /// Sets the time budget.
    pub fn with_time_limit_millis(mut self, millis: u64) -> Self {
        self.time_limit_millis = millis;
        self
    }

    pub fn with_variable_ordering(mut self, ordering: VariableOrdering) -> Self {
        self.variable_ordering = ordering;
        self
    }

    pub fn with_value_ordering(mut self, ordering: ValueOrdering) -> Self {
        self.value_ordering = ordering;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Turns the branch-and-bound cut on or off.
    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.enable_pruning = enabled;
        self
    }

    /// Adds a search stage.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn with_min_non_working_violation(mut self, cmp: Comparison) -> Self {
        self.min_non_working_violation = cmp;
        self
    }

    /// Returns the time budget as a Duration.
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_millis)
    }

    /// Checks the parts of the configuration that do not depend on a problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, phase) in self.phases.iter().enumerate() {
            if phase.select.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "phase {i} selects an empty index list"
                )));
            }
        }
        Ok(())
    }
}

/// How the next unbound decision variable is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableOrdering {
    /// First unbound variable in layout order.
    #[default]
    #[serde(alias = "FirstUnbound")]
    FirstUnbound,

    /// Smallest domain, ties broken on the highest upper bound.
    #[serde(alias = "MinDomainHighestMax")]
    MinDomainHighestMax,

    /// Smallest domain, ties broken on the lowest upper bound.
    #[serde(alias = "MinDomainLowestMax")]
    MinDomainLowestMax,

    /// Smallest domain, ties broken on the highest lower bound.
    #[serde(alias = "MinDomainHighestMin")]
    MinDomainHighestMin,

    /// Smallest domain, ties broken on the lowest lower bound.
    #[serde(alias = "MinDomainLowestMin")]
    MinDomainLowestMin,

    /// Uniformly random unbound variable.
    #[serde(alias = "Random")]
    Random,
}

/// Which value of a 0/1 decision is tried first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrdering {
    #[default]
    #[serde(alias = "PreferZero")]
    PreferZero,

    #[serde(alias = "PreferOne")]
    PreferOne,
}

/// One variable-ordering stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PhaseConfig {
    /// Which decision variables this stage branches on.
    #[serde(default)]
    pub select: PhaseSelection,

    /// Overrides the top-level variable ordering.
    #[serde(default, alias = "variableOrdering")]
    pub variable_ordering: Option<VariableOrdering>,

    /// Overrides the top-level value ordering.
    #[serde(default, alias = "valueOrdering")]
    pub value_ordering: Option<ValueOrdering>,
}

impl PhaseConfig {
    pub fn new(select: PhaseSelection) -> Self {
        Self {
            select,
            ..Self::default()
        }
    }

    pub fn with_variable_ordering(mut self, ordering: VariableOrdering) -> Self {
        self.variable_ordering = Some(ordering);
        self
    }

    pub fn with_value_ordering(mut self, ordering: ValueOrdering) -> Self {
        self.value_ordering = Some(ordering);
        self
    }
}

/// Subset of decision variables a stage covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseSelection {
    /// Every decision variable.
    #[default]
    All,

    /// Variables on the listed days.
    Days { days: Vec<usize> },

    /// Variables for the listed tasks.
    Tasks { tasks: Vec<usize> },

    /// Variables for the listed shifts.
    Shifts { shifts: Vec<usize> },

    /// Variables of the listed workers.
    Workers { workers: Vec<usize> },
}

impl PhaseSelection {
    /// Returns true for a list selection with no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            PhaseSelection::All => false,
            PhaseSelection::Days { days } => days.is_empty(),
            PhaseSelection::Tasks { tasks } => tasks.is_empty(),
            PhaseSelection::Shifts { shifts } => shifts.is_empty(),
            PhaseSelection::Workers { workers } => workers.is_empty(),
        }
    }

    /// Returns true if a variable at `(worker, task, shift, day)` is selected.
    pub fn matches(&self, worker: usize, task: usize, shift: usize, day: usize) -> bool {
        match self {
            PhaseSelection::All => true,
            PhaseSelection::Days { days } => days.contains(&day),
            PhaseSelection::Tasks { tasks } => tasks.contains(&task),
            PhaseSelection::Shifts { shifts } => shifts.contains(&shift),
            PhaseSelection::Workers { workers } => workers.contains(&worker),
        }
    }
}

#[cfg(test)]
mod tests;
