/*!
 * Memory Traits
 * Memory management abstractions used by the process engine
 */

use super::types::*;
use crate::core::types::{Address, Pid, Size};
use crate::process::Process;

/// Memory allocator interface
#[cfg_attr(test, mockall::automock)]
pub trait Allocator {
    /// Whether some free block could hold the process right now
    fn can_allocate(&self, process: &Process) -> bool;

    /// Place the process into a free block chosen by the active fit strategy
    fn allocate(&mut self, process: &Process) -> MemoryResult<Address>;

    /// Release the block held by the process, returning its size
    fn free(&mut self, process: &Process) -> MemoryResult<Size>;

    /// Whether the process currently occupies a block
    fn is_resident(&self, pid: Pid) -> bool;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Fixed capacity
    fn total_memory(&self) -> Size;

    /// Sum of occupied block sizes
    fn used_memory(&self) -> Size;

    /// Capacity minus used memory
    fn available_memory(&self) -> Size {
        self.total_memory() - self.used_memory()
    }

    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Address-ordered view of every block
    fn memory_map(&self) -> Vec<MemoryRegion>;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
