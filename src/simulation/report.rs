/*!
 * Run Reporting
 * Per-step outcomes and the aggregate report of a simulation run
 */

use crate::core::types::Pid;
use crate::process::{CpuTick, Event, Fired, TransitionResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Everything that happened during one driver step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuTick>,
    pub event: Event,
    pub result: TransitionResult<Pid>,
    /// Moves applied while firing `event`, compensations included
    pub cascade: Vec<Fired>,
}

/// Why the run loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EventLimit,
    AllDone,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EventLimit => write!(f, "event limit reached"),
            StopReason::AllDone => write!(f, "all processes done"),
        }
    }
}

/// Aggregate counters for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub steps: u64,
    pub events_fired: u64,
    pub events_succeeded: u64,
    pub events_failed: u64,
    /// Failed events bucketed by error kind
    pub failures: BTreeMap<&'static str, u64>,
    /// Compensating transitions applied on behalf of requested events
    pub compensations: u64,
    /// Processes terminated automatically after using up their CPU time
    pub completed: u64,
    pub processes: usize,
    pub processes_done: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

impl RunReport {
    pub(crate) fn record_event(&mut self, result: &TransitionResult<Pid>, cascade: &[Fired]) {
        self.events_fired += 1;
        match result {
            Ok(_) => self.events_succeeded += 1,
            Err(err) => {
                self.events_failed += 1;
                *self.failures.entry(err.kind()).or_default() += 1;
            }
        }
        self.compensations += cascade.iter().filter(|fired| fired.depth > 0).count() as u64;
    }

    pub(crate) fn record_tick(&mut self, tick: &CpuTick) {
        if tick.finished && matches!(tick.termination, Some(Ok(_))) {
            self.completed += 1;
        }
        self.compensations += tick.cascade.iter().filter(|fired| fired.depth > 0).count() as u64;
    }
}
