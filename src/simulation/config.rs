/*!
 * Simulation Configuration
 *
 * Every constant the core needs is injected from here. Sources, lowest to
 * highest priority: built-in defaults, a JSON file, `PROCSIM_*` environment
 * variables, then command-line flags applied by the binary.
 */

use super::generator::SteppedRange;
use crate::core::limits::{
    DEFAULT_CPU_QUANTUM, DEFAULT_MAX_EVENTS, DEFAULT_TOTAL_MEMORY, INITIAL_HELD_JOBS,
    INITIAL_JOB_SIZE, INITIAL_JOB_TIME, MAX_PROCESS_SIZE, MAX_PROCESS_TIME, MIN_PROCESS_SIZE,
    MIN_PROCESS_TIME, PROCESS_SIZE_STEP, PROCESS_TIME_STEP,
};
use crate::core::types::{CpuTime, Size};
use crate::memory::FitStrategy;
use crate::process::{State, StateLimits};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Configuration result
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {reason}")]
    #[diagnostic(
        code(config::io),
        help("Check that the file exists and is readable.")
    )]
    Io { path: String, reason: String },

    #[error("Invalid configuration JSON: {0}")]
    #[diagnostic(
        code(config::parse),
        help("Fields use snake_case names; unknown fields are rejected.")
    )]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid))]
    Invalid(String),
}

/// Initially active, memory-resident jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialJobs {
    pub states: Vec<State>,
    pub size: Size,
    pub cpu_required: CpuTime,
}

impl Default for InitialJobs {
    fn default() -> Self {
        Self {
            states: vec![State::Ready, State::SuspendUser, State::Blocked],
            size: INITIAL_JOB_SIZE,
            cpu_required: INITIAL_JOB_TIME,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub total_memory: Size,
    pub fit_strategy: FitStrategy,
    pub state_limits: StateLimits,
    pub cpu_quantum: CpuTime,
    pub max_events: u64,
    pub process_size: SteppedRange,
    pub process_time: SteppedRange,
    pub initial_jobs: InitialJobs,
    pub initial_held: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            fit_strategy: FitStrategy::default(),
            state_limits: StateLimits::default(),
            cpu_quantum: DEFAULT_CPU_QUANTUM,
            max_events: DEFAULT_MAX_EVENTS,
            process_size: SteppedRange::new(
                MIN_PROCESS_SIZE as u32,
                MAX_PROCESS_SIZE as u32,
                PROCESS_SIZE_STEP as u32,
            ),
            process_time: SteppedRange::new(MIN_PROCESS_TIME, MAX_PROCESS_TIME, PROCESS_TIME_STEP),
            initial_jobs: InitialJobs::default(),
            initial_held: INITIAL_HELD_JOBS,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Apply `PROCSIM_*` environment overrides
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment, test fixtures)
    pub fn apply_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_override(&lookup, "PROCSIM_TOTAL_MEMORY")? {
            self.total_memory = value;
        }
        if let Some(value) = parse_override(&lookup, "PROCSIM_FIT")? {
            self.fit_strategy = value;
        }
        if let Some(value) = parse_override(&lookup, "PROCSIM_MAX_EVENTS")? {
            self.max_events = value;
        }
        if let Some(value) = parse_override(&lookup, "PROCSIM_QUANTUM")? {
            self.cpu_quantum = value;
        }
        if let Some(value) = parse_override(&lookup, "PROCSIM_SEED")? {
            self.seed = Some(value);
        }
        Ok(self)
    }

    /// Reject configurations the core cannot run
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: String| -> ConfigResult<()> { Err(ConfigError::Invalid(reason)) };

        if self.total_memory == 0 {
            return invalid("total_memory must be positive".into());
        }
        if self.cpu_quantum == 0 {
            return invalid("cpu_quantum must be positive".into());
        }
        if self.state_limits.limit(State::Run) == Some(0) {
            return invalid("Run capacity must be at least 1".into());
        }
        if let Some(problem) = self.process_size.problem() {
            return invalid(format!("process_size: {problem}"));
        }
        if let Some(problem) = self.process_time.problem() {
            return invalid(format!("process_time: {problem}"));
        }

        let jobs = &self.initial_jobs;
        if !jobs.states.is_empty() && (jobs.size == 0 || jobs.cpu_required == 0) {
            return invalid("initial jobs need a positive size and CPU requirement".into());
        }
        if let Some(state) = jobs.states.iter().find(|s| !s.is_memory_resident()) {
            return invalid(format!("initial jobs cannot start in {state}"));
        }
        if jobs.size.saturating_mul(jobs.states.len()) > self.total_memory {
            return invalid(format!(
                "{} initial jobs of {}k do not fit in {}k",
                jobs.states.len(),
                jobs.size,
                self.total_memory
            ));
        }
        for (state, capacity) in self.state_limits.iter() {
            let placed = jobs.states.iter().filter(|s| **s == state).count();
            if placed > capacity {
                return invalid(format!(
                    "{placed} initial jobs exceed {state} capacity {capacity}"
                ));
            }
        }

        Ok(())
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{key}={raw}: {e}")))
        })
        .transpose()
}
