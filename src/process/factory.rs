/*!
 * Process Factory
 * Explicit owner of the process id counter
 */

use super::record::Process;
use crate::core::types::{CpuTime, Pid, Size};

/// Mints process records with monotonically increasing ids
#[derive(Debug, Clone)]
pub struct ProcessFactory {
    next_pid: Pid,
}

impl ProcessFactory {
    /// Create a factory whose first id is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: Pid) -> Self {
        Self { next_pid: first }
    }

    pub fn create(&mut self, size: Size, cpu_required: CpuTime) -> Process {
        let pid = self.next_pid;
        self.next_pid += 1;
        Process::new(pid, size, cpu_required)
    }

    /// Id the next created process will receive
    pub fn peek_next(&self) -> Pid {
        self.next_pid
    }
}

impl Default for ProcessFactory {
    fn default() -> Self {
        Self::new()
    }
}
