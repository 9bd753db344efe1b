/*!
 * Process Types
 * States, events, capacity limits and errors for the transition engine
 */

use crate::core::limits::{DEFAULT_BLOCKED_CAPACITY, DEFAULT_READY_CAPACITY, DEFAULT_RUN_CAPACITY};
use crate::core::types::Pid;
use crate::memory::MemoryError;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// State store operation result
pub type StoreResult<T> = Result<T, StoreError>;

/// Transition operation result
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Logical process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Admitted but not yet given memory
    Hold,
    /// Memory-resident, waiting for the CPU
    Ready,
    /// Holding the CPU
    Run,
    /// Waiting on I/O
    Blocked,
    /// Suspended by the user
    SuspendUser,
    /// Suspended by the system (timer)
    SuspendSystem,
    /// Terminated
    Done,
}

impl State {
    pub const COUNT: usize = 7;

    pub const ALL: [State; State::COUNT] = [
        State::Hold,
        State::Ready,
        State::Run,
        State::Blocked,
        State::SuspendUser,
        State::SuspendSystem,
        State::Done,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether residents of this state hold a memory block
    #[inline]
    pub const fn is_memory_resident(self) -> bool {
        !matches!(self, State::Hold | State::Done)
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, State::Done)
    }

    pub const fn name(self) -> &'static str {
        match self {
            State::Hold => "Hold",
            State::Ready => "Ready",
            State::Run => "Run",
            State::Blocked => "Blocked",
            State::SuspendUser => "Suspend_User",
            State::SuspendSystem => "Suspend_System",
            State::Done => "Done",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One transition kind: move a process from one state to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub from: State,
    pub to: State,
}

impl Event {
    pub const fn new(from: State, to: State) -> Self {
        Self { from, to }
    }

    /// Memory operation implied by the move
    pub const fn memory_effect(&self) -> MemoryEffect {
        match (self.from.is_memory_resident(), self.to.is_memory_resident()) {
            (false, true) => MemoryEffect::Acquire,
            (true, false) => MemoryEffect::Release,
            _ => MemoryEffect::Keep,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Memory side effect of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryEffect {
    Acquire,
    Release,
    Keep,
}

/// Per-state capacity table; states without an entry are unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateLimits(BTreeMap<State, usize>);

impl StateLimits {
    /// No state has a capacity limit
    pub fn unbounded() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with_limit(mut self, state: State, capacity: usize) -> Self {
        self.0.insert(state, capacity);
        self
    }

    pub fn limit(&self, state: State) -> Option<usize> {
        self.0.get(&state).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, usize)> + '_ {
        self.0.iter().map(|(state, capacity)| (*state, *capacity))
    }

    pub(crate) fn to_table(&self) -> [Option<usize>; State::COUNT] {
        let mut table = [None; State::COUNT];
        for (state, capacity) in self.iter() {
            table[state.index()] = Some(capacity);
        }
        table
    }
}

impl Default for StateLimits {
    fn default() -> Self {
        Self::unbounded()
            .with_limit(State::Ready, DEFAULT_READY_CAPACITY)
            .with_limit(State::Run, DEFAULT_RUN_CAPACITY)
            .with_limit(State::Blocked, DEFAULT_BLOCKED_CAPACITY)
    }
}

/// State store errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum StoreError {
    #[error("State {state} is full (capacity {capacity})")]
    #[diagnostic(
        code(store::state_full),
        help("Move a resident out of the state before placing another process.")
    )]
    StateFull { state: State, capacity: usize },

    #[error("Process {pid} is not resident in state {state}")]
    #[diagnostic(
        code(store::not_resident),
        help("The process lives in a different state, or no longer exists.")
    )]
    NotResident { pid: Pid, state: State },

    #[error("Process {pid} is already placed in state {state}")]
    #[diagnostic(
        code(store::duplicate_process),
        help("A process lives in exactly one state. Remove it before placing it again.")
    )]
    DuplicateProcess { pid: Pid, state: State },
}

/// Transition errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum TransitionError {
    #[error("Destination state {state} is full (capacity {capacity})")]
    #[diagnostic(
        code(transition::state_full),
        help("No compensating transition could make room in the destination state.")
    )]
    StateFull { state: State, capacity: usize },

    #[error("No process resides in state {0}")]
    #[diagnostic(
        code(transition::no_resident_process),
        help("The source state is empty and no compensating transition refilled it.")
    )]
    NoResidentProcess(State),

    #[error("Process {pid} is not resident in state {state}")]
    #[diagnostic(code(transition::not_resident))]
    NotResident { pid: Pid, state: State },

    #[error("Process {pid} is already placed in state {state}")]
    #[diagnostic(code(transition::duplicate_process))]
    DuplicateProcess { pid: Pid, state: State },

    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("State {0} is terminal")]
    #[diagnostic(
        code(transition::terminal_state),
        help("Processes never leave the Done state.")
    )]
    TerminalState(State),
}

impl TransitionError {
    /// Stable short name, used to bucket failures in run reports
    pub fn kind(&self) -> &'static str {
        match self {
            TransitionError::StateFull { .. } => "state_full",
            TransitionError::NoResidentProcess(_) => "no_resident_process",
            TransitionError::NotResident { .. } => "not_resident",
            TransitionError::DuplicateProcess { .. } => "duplicate_process",
            TransitionError::Memory(MemoryError::OutOfMemory { .. }) => "out_of_memory",
            TransitionError::Memory(MemoryError::NotFound(_)) => "not_found",
            TransitionError::Memory(MemoryError::AlreadyResident(_)) => "already_resident",
            TransitionError::TerminalState(_) => "terminal_state",
        }
    }
}

// Allow conversion from StoreError to TransitionError
impl From<StoreError> for TransitionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StateFull { state, capacity } => {
                TransitionError::StateFull { state, capacity }
            }
            StoreError::NotResident { pid, state } => TransitionError::NotResident { pid, state },
            StoreError::DuplicateProcess { pid, state } => {
                TransitionError::DuplicateProcess { pid, state }
            }
        }
    }
}
