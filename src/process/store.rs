/*!
 * State Store
 *
 * Fixed table of per-state FIFO buckets indexed by [`State`]. Each bucket owns
 * its process records; a pid index guarantees a process lives in exactly one
 * bucket at a time.
 */

use super::record::Process;
use super::types::{State, StateLimits, StoreError, StoreResult};
use crate::core::types::Pid;
use ahash::AHashMap;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::trace;

/// Placement refused; the process is handed back untouched
#[derive(Error, Debug)]
#[error("{error} ({process} handed back)")]
pub struct Rejected {
    pub process: Process,
    #[source]
    pub error: StoreError,
}

impl Rejected {
    pub fn into_parts(self) -> (Process, StoreError) {
        (self.process, self.error)
    }
}

/// Per-state process storage with capacity enforcement
#[derive(Debug, Clone)]
pub struct StateStore {
    buckets: [VecDeque<Process>; State::COUNT],
    capacities: [Option<usize>; State::COUNT],
    index: AHashMap<Pid, State>,
}

impl StateStore {
    pub fn new(limits: &StateLimits) -> Self {
        Self {
            buckets: Default::default(),
            capacities: limits.to_table(),
            index: AHashMap::new(),
        }
    }

    /// Store without any capacity limits
    pub fn unbounded() -> Self {
        Self::new(&StateLimits::unbounded())
    }

    #[inline]
    pub fn capacity_of(&self, state: State) -> Option<usize> {
        self.capacities[state.index()]
    }

    #[inline]
    pub fn count_in(&self, state: State) -> usize {
        self.buckets[state.index()].len()
    }

    /// False for uncapacitated states
    #[inline]
    pub fn is_full(&self, state: State) -> bool {
        self.capacity_of(state)
            .is_some_and(|capacity| self.count_in(state) >= capacity)
    }

    #[inline]
    pub fn is_empty(&self, state: State) -> bool {
        self.buckets[state.index()].is_empty()
    }

    /// Append to the state's queue unless it is full
    pub fn place(&mut self, process: Process, state: State) -> Result<(), Rejected> {
        if let Some(&current) = self.index.get(&process.pid()) {
            return Err(Rejected {
                error: StoreError::DuplicateProcess {
                    pid: process.pid(),
                    state: current,
                },
                process,
            });
        }
        if let Some(capacity) = self.capacity_of(state).filter(|_| self.is_full(state)) {
            return Err(Rejected {
                process,
                error: StoreError::StateFull { state, capacity },
            });
        }

        trace!(pid = process.pid(), %state, "placed");
        self.index.insert(process.pid(), state);
        self.buckets[state.index()].push_back(process);
        Ok(())
    }

    /// Earliest-inserted resident of the state
    #[inline]
    pub fn first_of(&self, state: State) -> Option<&Process> {
        self.buckets[state.index()].front()
    }

    /// Residents in insertion order
    pub fn all_of(&self, state: State) -> impl ExactSizeIterator<Item = &Process> + '_ {
        self.buckets[state.index()].iter()
    }

    /// Largest resident by memory size, earliest on ties
    pub fn largest_in(&self, state: State) -> Option<&Process> {
        self.all_of(state).fold(None, |largest: Option<&Process>, process| match largest {
            Some(current) if current.size() >= process.size() => Some(current),
            _ => Some(process),
        })
    }

    /// Remove the exact process from the state's queue
    pub fn remove(&mut self, pid: Pid, from: State) -> StoreResult<Process> {
        self.take(pid, from).map(|(_, process)| process)
    }

    /// Remove and report the queue position the process held
    pub(crate) fn take(&mut self, pid: Pid, from: State) -> StoreResult<(usize, Process)> {
        let bucket = &mut self.buckets[from.index()];
        let position = bucket
            .iter()
            .position(|process| process.pid() == pid)
            .ok_or(StoreError::NotResident { pid, state: from })?;
        let process = bucket
            .remove(position)
            .ok_or(StoreError::NotResident { pid, state: from })?;
        self.index.remove(&pid);
        Ok((position, process))
    }

    /// Put a process back where `take` found it. Capacity is not rechecked:
    /// the slot was occupied a moment ago.
    pub(crate) fn restore(&mut self, process: Process, state: State, position: usize) {
        let bucket = &mut self.buckets[state.index()];
        let position = position.min(bucket.len());
        self.index.insert(process.pid(), state);
        bucket.insert(position, process);
    }

    /// Mutable access to the queue head, used to credit CPU time
    pub(crate) fn first_mut(&mut self, state: State) -> Option<&mut Process> {
        self.buckets[state.index()].front_mut()
    }

    /// State the process currently lives in
    pub fn state_of(&self, pid: Pid) -> Option<State> {
        self.index.get(&pid).copied()
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        let state = self.state_of(pid)?;
        self.all_of(state).find(|process| process.pid() == pid)
    }

    /// Ids of the state's residents in insertion order
    pub fn pids_in(&self, state: State) -> Vec<Pid> {
        self.all_of(state).map(Process::pid).collect()
    }

    /// Number of live processes across all states
    pub fn process_count(&self) -> usize {
        self.index.len()
    }

    /// Whether every process has reached Done
    pub fn all_done(&self) -> bool {
        self.count_in(State::Done) == self.process_count()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(&StateLimits::default())
    }
}
