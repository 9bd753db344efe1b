/*!
 * Cascading Transitions
 *
 * Driver-facing transition API. Some moves are blocked by a full destination
 * or an empty source; those fire compensating transitions first and then
 * retry. Whenever Run is vacated the CPU slot is refilled from Ready.
 * Compensations only run once the source state has a process to move, so a
 * request that fails for lack of a resident leaves every state untouched.
 *
 * | Requested                      | Before                                    | After        |
 * |--------------------------------|-------------------------------------------|--------------|
 * | Ready -> Run                   | Ready empty: Suspend_System -> Ready,     |              |
 * |                                | else Hold -> Ready; Run full:             |              |
 * |                                | Run -> Suspend_System (no refill)         |              |
 * | Run -> Blocked                 | Blocked full: Blocked -> Done             | refill CPU   |
 * | Blocked/Suspend_* -> Ready     | Ready full: Ready -> Hold                 |              |
 * | Run -> Suspend_*               |                                           | refill CPU   |
 * | * -> Done                      |                                           | refill CPU   |
 * | Ready -> Hold                  | evicts the largest Ready resident         |              |
 * | Hold -> Ready                  | none, even when Ready is full             |              |
 */

use super::ProcessEngine;
use crate::core::types::Pid;
use crate::memory::Allocator;
use crate::process::record::Process;
use crate::process::types::{Event, State, TransitionError, TransitionResult};
use tracing::{debug, instrument};

/// Whether a transition may refill the CPU slot afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FollowUp {
    Refill,
    Skip,
}

impl<A: Allocator> ProcessEngine<A> {
    /// Fire a transition with compensation.
    ///
    /// Failed compensations are not reported: the requested transition then
    /// fails with its own error.
    #[instrument(level = "debug", skip(self, event), fields(event = %event))]
    pub fn fire(&mut self, event: Event) -> TransitionResult<Pid> {
        self.journal.clear();
        self.fire_at(event, 0, FollowUp::Refill)
    }

    pub(super) fn fire_at(&mut self, event: Event, depth: u8, follow_up: FollowUp) -> TransitionResult<Pid> {
        use State::*;

        let pid = match (event.from, event.to) {
            (Ready, Run) => {
                if self.store.is_empty(Ready) {
                    let _ = self.compensate(Event::new(SuspendSystem, Ready), depth, FollowUp::Refill)
                        || self.compensate(Event::new(Hold, Ready), depth, FollowUp::Refill);
                }
                // Run is only vacated once a successor is known
                let pid = self.resolve_first(Ready)?;
                if self.store.is_full(Run) {
                    self.compensate(Event::new(Run, SuspendSystem), depth, FollowUp::Skip);
                }
                self.move_process(pid, event, depth)?
            }
            (Run, Blocked) => {
                let pid = self.resolve_first(Run)?;
                if self.store.is_full(Blocked) {
                    self.compensate(Event::new(Blocked, Done), depth, FollowUp::Refill);
                }
                self.move_process(pid, event, depth)?
            }
            (Blocked | SuspendUser | SuspendSystem, Ready) => {
                let pid = self.resolve_first(event.from)?;
                if self.store.is_full(Ready) {
                    self.compensate(Event::new(Ready, Hold), depth, FollowUp::Refill);
                }
                self.move_process(pid, event, depth)?
            }
            (Ready, Hold) => {
                let pid = self
                    .store
                    .largest_in(Ready)
                    .map(Process::pid)
                    .ok_or(TransitionError::NoResidentProcess(Ready))?;
                self.move_process(pid, event, depth)?
            }
            _ => {
                let pid = self.resolve_first(event.from)?;
                self.move_process(pid, event, depth)?
            }
        };

        if follow_up == FollowUp::Refill && (event.from == Run || event.to == Done) {
            self.refill_cpu(depth);
        }

        Ok(pid)
    }

    /// Fire a compensating transition one level deeper.
    /// Returns whether it succeeded.
    fn compensate(&mut self, event: Event, depth: u8, follow_up: FollowUp) -> bool {
        if depth >= self.max_depth {
            debug!(%event, depth, "cascade depth limit reached, compensation unavailable");
            return false;
        }

        match self.fire_at(event, depth + 1, follow_up) {
            Ok(pid) => {
                debug!(pid, %event, depth = depth + 1, "compensation fired");
                true
            }
            Err(err) => {
                debug!(%event, error = %err, "compensation unavailable");
                false
            }
        }
    }

    /// Backfill a vacant CPU slot from Ready
    pub(super) fn refill_cpu(&mut self, depth: u8) {
        if self.store.is_empty(State::Run) {
            self.compensate(Event::new(State::Ready, State::Run), depth, FollowUp::Refill);
        }
    }
}
