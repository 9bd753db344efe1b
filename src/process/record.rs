/*!
 * Process Record
 * Identity and CPU usage counters for one simulated process
 */

use crate::core::types::{CpuTime, Pid, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One simulated process.
///
/// Identity and footprint are fixed at creation; only `cpu_used` changes.
/// Records are minted by [`ProcessFactory`](super::ProcessFactory), which owns
/// the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pid: Pid,
    size: Size,
    cpu_required: CpuTime,
    cpu_used: CpuTime,
}

impl Process {
    pub(crate) fn new(pid: Pid, size: Size, cpu_required: CpuTime) -> Self {
        Self {
            pid,
            size,
            cpu_required,
            cpu_used: 0,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn cpu_required(&self) -> CpuTime {
        self.cpu_required
    }

    #[inline]
    pub fn cpu_used(&self) -> CpuTime {
        self.cpu_used
    }

    #[inline]
    pub fn cpu_remaining(&self) -> CpuTime {
        self.cpu_required - self.cpu_used
    }

    /// Credit CPU time, capped at the requirement. Returns the units credited.
    pub fn use_time(&mut self, quantum: CpuTime) -> CpuTime {
        let credited = quantum.min(self.cpu_remaining());
        self.cpu_used += credited;
        credited
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.cpu_used == self.cpu_required
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}/{}k/{}t", self.pid, self.size, self.cpu_required)
    }
}
