/*!
 * Process Engine
 *
 * Couples the [`StateStore`] with a memory [`Allocator`] so that every state
 * change carries its memory side effect atomically.
 *
 * # Layers
 *
 * - [`ProcessEngine::change_state`]: move the head of the source state, with
 *   the allocation or free the move implies, and nothing else.
 * - [`ProcessEngine::fire`]: the driver-facing API. Fires compensating
 *   transitions when the direct move is blocked and refills the CPU slot
 *   whenever Run is vacated.
 * - [`ProcessEngine::tick`]: credits CPU time to the running process and
 *   terminates it once its requirement is met.
 */

mod cascade;
mod transition;

use super::record::Process;
use super::store::StateStore;
use super::types::{Event, State, TransitionError, TransitionResult};
use crate::core::limits::MAX_CASCADE_DEPTH;
use crate::core::types::{CpuTime, Pid};
use crate::memory::{Allocator, MemoryManager};
use serde::Serialize;
use tracing::{debug, info};

/// One applied move, recorded in the cascade journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fired {
    pub event: Event,
    pub pid: Pid,
    /// 0 for the requested transition, >0 for compensations
    pub depth: u8,
}

/// Result of crediting CPU time to the running process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuTick {
    pub pid: Pid,
    pub credited: CpuTime,
    pub finished: bool,
    /// Outcome of the automatic Run -> Done, when the process finished
    pub termination: Option<TransitionResult<Pid>>,
    /// Moves applied by the termination and the CPU refill that followed it
    pub cascade: Vec<Fired>,
}

/// State engine bound to a memory allocator
#[derive(Debug, Clone)]
pub struct ProcessEngine<A = MemoryManager> {
    store: StateStore,
    memory: A,
    max_depth: u8,
    journal: Vec<Fired>,
}

impl<A: Allocator> ProcessEngine<A> {
    pub fn new(store: StateStore, memory: A) -> Self {
        Self {
            store,
            memory,
            max_depth: MAX_CASCADE_DEPTH,
            journal: Vec::new(),
        }
    }

    /// Limit how deeply compensating transitions may nest
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    #[inline]
    pub fn memory(&self) -> &A {
        &self.memory
    }

    /// Moves applied by the most recent `fire`, `change_state` or
    /// terminating `tick`, in the order they happened
    pub fn last_cascade(&self) -> &[Fired] {
        &self.journal
    }

    /// Place a new process directly into `state`, allocating memory when the
    /// state is memory-resident
    pub fn admit(&mut self, process: Process, state: State) -> TransitionResult<Pid> {
        let pid = process.pid();
        if state.is_terminal() {
            return Err(TransitionError::TerminalState(state));
        }
        if let Some(capacity) = self.store.capacity_of(state).filter(|_| self.store.is_full(state)) {
            return Err(TransitionError::StateFull { state, capacity });
        }
        if state.is_memory_resident() {
            self.memory.allocate(&process)?;
        }

        if let Err(rejected) = self.store.place(process, state) {
            let (process, error) = rejected.into_parts();
            if state.is_memory_resident() {
                let _ = self.memory.free(&process);
            }
            return Err(error.into());
        }

        debug!(pid, %state, "process admitted");
        Ok(pid)
    }

    /// Credit `quantum` CPU units to the running process. A process that
    /// reaches its requirement is moved Run -> Done and the CPU is refilled.
    pub fn tick(&mut self, quantum: CpuTime) -> Option<CpuTick> {
        let process = self.store.first_mut(State::Run)?;
        let credited = process.use_time(quantum);
        let pid = process.pid();

        if !process.is_done() {
            return Some(CpuTick {
                pid,
                credited,
                finished: false,
                termination: None,
                cascade: Vec::new(),
            });
        }

        info!(pid, "process completed its CPU requirement");
        self.journal.clear();
        let termination = self.move_process(pid, Event::new(State::Run, State::Done), 0);
        if termination.is_ok() {
            self.refill_cpu(0);
        }

        Some(CpuTick {
            pid,
            credited,
            finished: true,
            termination: Some(termination),
            cascade: self.journal.clone(),
        })
    }
}
