/*!
 * Memory Management
 *
 * Contiguous allocator over a fixed-capacity user memory.
 *
 * ## Block List
 *
 * Memory is a single address-ordered list of blocks. Each block is either
 * occupied by exactly one process or free; the sizes always sum to the
 * configured capacity. The list starts as one free block spanning all memory.
 *
 * ## Features
 *
 * - **Fit strategies**: first, best or worst fit, selectable at runtime
 * - **Block splitting**: a larger free block is split into the occupied
 *   extent followed by a free remainder
 * - **Coalescing**: adjacent free blocks are merged after every free
 * - **Memory pressure tracking**: warns at 80%, critical at 95%
 */

mod allocator;
mod free_list;
mod stats;

use super::traits::{Allocator, MemoryInfo};
use super::types::{Block, FitStrategy, FreeBlock, MemoryRegion, MemoryResult, MemoryStats};
use crate::core::types::{Address, Pid, Size};
use crate::process::Process;
use log::info;

/// Memory manager
#[derive(Debug, Clone)]
pub struct MemoryManager {
    pub(super) blocks: Vec<Block>,
    pub(super) total_memory: Size,
    pub(super) used_memory: Size,
    pub(super) strategy: FitStrategy,
    // Memory pressure thresholds (fraction of capacity)
    pub(super) warning_threshold: f64,  // 80%
    pub(super) critical_threshold: f64, // 95%
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::with_capacity(crate::core::limits::DEFAULT_TOTAL_MEMORY, FitStrategy::default())
    }

    /// Create memory manager with custom capacity and fit strategy
    pub fn with_capacity(total: Size, strategy: FitStrategy) -> Self {
        info!(
            "Memory manager initialized with {}k using {} fit",
            total, strategy
        );
        let blocks = if total > 0 {
            vec![Block::Free(FreeBlock::new(total))]
        } else {
            Vec::new()
        };
        Self {
            blocks,
            total_memory: total,
            used_memory: 0,
            strategy,
            warning_threshold: 0.80,
            critical_threshold: 0.95,
        }
    }

    pub fn strategy(&self) -> FitStrategy {
        self.strategy
    }

    /// Switch fit strategy; existing blocks are untouched
    pub fn set_strategy(&mut self, strategy: FitStrategy) {
        if strategy != self.strategy {
            info!("Fit strategy changed from {} to {}", self.strategy, strategy);
            self.strategy = strategy;
        }
    }

    /// Address-ordered block list
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    pub fn used_memory(&self) -> Size {
        self.used_memory
    }

    pub fn available_memory(&self) -> Size {
        self.total_memory - self.used_memory
    }

    /// Starting address of the block held by `pid`
    pub fn address_of(&self, pid: Pid) -> Option<Address> {
        let mut address = 0;
        for block in &self.blocks {
            if block.occupant() == Some(pid) {
                return Some(address);
            }
            address += block.size();
        }
        None
    }

    /// Whether `pid` currently occupies a block
    pub fn is_resident(&self, pid: Pid) -> bool {
        self.position_of(pid).is_some()
    }

    pub(super) fn position_of(&self, pid: Pid) -> Option<usize> {
        self.blocks.iter().position(|block| block.occupant() == Some(pid))
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn can_allocate(&self, process: &Process) -> bool {
        MemoryManager::can_allocate(self, process)
    }

    fn allocate(&mut self, process: &Process) -> MemoryResult<Address> {
        MemoryManager::allocate(self, process)
    }

    fn free(&mut self, process: &Process) -> MemoryResult<Size> {
        MemoryManager::free(self, process)
    }

    fn is_resident(&self, pid: Pid) -> bool {
        MemoryManager::is_resident(self, pid)
    }
}

impl MemoryInfo for MemoryManager {
    fn total_memory(&self) -> Size {
        self.total_memory
    }

    fn used_memory(&self) -> Size {
        self.used_memory
    }

    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn memory_map(&self) -> Vec<MemoryRegion> {
        MemoryManager::memory_map(self)
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}
