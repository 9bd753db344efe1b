/*!
 * Direct Transitions
 * Single state-to-state moves with their memory side effects
 */

use super::{Fired, ProcessEngine};
use crate::core::types::Pid;
use crate::memory::{Allocator, MemoryError};
use crate::process::record::Process;
use crate::process::types::{
    Event, MemoryEffect, State, TransitionError, TransitionResult,
};
use tracing::{debug, warn};

impl<A: Allocator> ProcessEngine<A> {
    /// Move the earliest resident of `event.from` into `event.to`.
    ///
    /// No compensation is attempted. On any failure the process stays at its
    /// original queue position and memory is left as it was.
    pub fn change_state(&mut self, event: Event) -> TransitionResult<Pid> {
        self.journal.clear();
        let pid = self.resolve_first(event.from)?;
        self.move_process(pid, event, 0)
    }

    pub(super) fn resolve_first(&self, state: State) -> TransitionResult<Pid> {
        self.store
            .first_of(state)
            .map(Process::pid)
            .ok_or(TransitionError::NoResidentProcess(state))
    }

    /// Move a specific process, applying the memory effect of the event
    pub(super) fn move_process(&mut self, pid: Pid, event: Event, depth: u8) -> TransitionResult<Pid> {
        if event.from.is_terminal() {
            return Err(TransitionError::TerminalState(event.from));
        }
        if event.from != event.to {
            if let Some(capacity) = self
                .store
                .capacity_of(event.to)
                .filter(|_| self.store.is_full(event.to))
            {
                return Err(TransitionError::StateFull {
                    state: event.to,
                    capacity,
                });
            }
        }

        let effect = event.memory_effect();
        let (position, process) = self.store.take(pid, event.from)?;

        let performed = match self.apply_memory(&process, effect) {
            Ok(performed) => performed,
            Err(err) => {
                debug!(pid, %event, error = %err, "memory operation refused");
                self.store.restore(process, event.from, position);
                return Err(err.into());
            }
        };

        if let Err(rejected) = self.store.place(process, event.to) {
            let (process, error) = rejected.into_parts();
            if performed {
                self.undo_memory(&process, effect);
            }
            self.store.restore(process, event.from, position);
            return Err(error.into());
        }

        debug!(pid, %event, depth, "transition applied");
        self.journal.push(Fired { event, pid, depth });
        Ok(pid)
    }

    /// Returns whether a memory operation actually happened
    fn apply_memory(&mut self, process: &Process, effect: MemoryEffect) -> Result<bool, MemoryError> {
        match effect {
            MemoryEffect::Acquire => self.memory.allocate(process).map(|_| true),
            MemoryEffect::Release if self.memory.is_resident(process.pid()) => {
                self.memory.free(process).map(|_| true)
            }
            MemoryEffect::Release => {
                warn!(pid = process.pid(), "releasing a process that held no memory");
                Ok(false)
            }
            MemoryEffect::Keep => Ok(false),
        }
    }

    fn undo_memory(&mut self, process: &Process, effect: MemoryEffect) {
        let undo = match effect {
            MemoryEffect::Acquire => self.memory.free(process).map(|_| ()),
            MemoryEffect::Release => self.memory.allocate(process).map(|_| ()),
            MemoryEffect::Keep => Ok(()),
        };
        if let Err(err) = undo {
            warn!(pid = process.pid(), error = %err, "could not roll back memory operation");
        }
    }
}
