/*!
 * Memory Allocator Implementation
 * Allocation and free logic
 */

use super::MemoryManager;
use crate::core::types::{Address, Size};
use crate::memory::types::{Block, MemoryError, MemoryPressure, MemoryResult};
use crate::process::Process;
use log::{debug, warn};

impl MemoryManager {
    /// Whether some free block is large enough for the process
    pub fn can_allocate(&self, process: &Process) -> bool {
        self.find_fitting_block(process.size()).is_some()
    }

    /// Allocate a block for the process using the active fit strategy.
    ///
    /// A larger free block is split into the occupied extent followed by a
    /// free remainder; an exact fit converts the block in place.
    pub fn allocate(&mut self, process: &Process) -> MemoryResult<Address> {
        let pid = process.pid();
        let size = process.size();

        if self.is_resident(pid) {
            warn!("Process {} requested a second block", process);
            return Err(MemoryError::AlreadyResident(pid));
        }

        let out_of_memory = || MemoryError::OutOfMemory {
            requested: size,
            largest_free: self.largest_free_block(),
            available: self.available_memory(),
        };

        let index = self.find_fitting_block(size).ok_or_else(out_of_memory)?;
        let (occupied, remainder) = match self.blocks[index] {
            Block::Free(free) => free.carve(pid, size),
            Block::Occupied(_) => None,
        }
        .ok_or_else(out_of_memory)?;

        self.blocks[index] = Block::Occupied(occupied);
        if let Some(remainder) = remainder {
            self.blocks.insert(index + 1, Block::Free(remainder));
            debug!(
                "Split block: keeping {}k, returning {}k to the free list",
                size,
                remainder.size()
            );
        }
        self.used_memory += size;

        let address = self.address_at(index);
        if let Some(level) = self.check_memory_pressure(self.used_memory) {
            warn!(
                "Memory pressure {}: allocated {}k at {} for {} ({:.1}% used: {} / {})",
                level,
                size,
                address,
                process,
                self.usage_ratio() * 100.0,
                self.used_memory,
                self.total_memory
            );
        } else {
            debug!(
                "Allocated {}k at {} for {} ({} fit)",
                size, address, process, self.strategy
            );
        }

        Ok(address)
    }

    /// Replace the process's block with a free block of the same size and
    /// coalesce adjacent free space
    pub fn free(&mut self, process: &Process) -> MemoryResult<Size> {
        let pid = process.pid();
        let Some(index) = self.position_of(pid) else {
            warn!("Attempted to free non-resident process {}", process);
            return Err(MemoryError::NotFound(pid));
        };

        let size = match self.blocks[index] {
            Block::Occupied(occupied) => {
                self.blocks[index] = Block::Free(occupied.release());
                occupied.size()
            }
            Block::Free(_) => return Err(MemoryError::NotFound(pid)),
        };
        self.used_memory -= size;

        let absorbed = self.coalesce_free_blocks();
        debug!(
            "Freed {}k from {} ({}k now available, {} blocks coalesced)",
            size,
            process,
            self.available_memory(),
            absorbed
        );

        Ok(size)
    }

    fn address_at(&self, index: usize) -> Address {
        self.blocks[..index].iter().map(Block::size).sum()
    }

    fn usage_ratio(&self) -> f64 {
        if self.total_memory == 0 {
            return 0.0;
        }
        self.used_memory as f64 / self.total_memory as f64
    }

    /// Check memory pressure level
    pub(super) fn check_memory_pressure(&self, used: Size) -> Option<MemoryPressure> {
        if self.total_memory == 0 {
            return None;
        }
        let usage_ratio = used as f64 / self.total_memory as f64;

        if usage_ratio >= self.critical_threshold {
            Some(MemoryPressure::Critical)
        } else if usage_ratio >= self.warning_threshold {
            Some(MemoryPressure::High)
        } else {
            None
        }
    }
}
