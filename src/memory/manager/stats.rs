/*!
 * Memory Statistics
 * Memory map and usage reporting for observers
 */

use super::MemoryManager;
use crate::memory::types::{Block, MemoryRegion, MemoryStats};

impl MemoryManager {
    /// Address-ordered view of every block
    pub fn memory_map(&self) -> Vec<MemoryRegion> {
        let mut address = 0;
        self.blocks
            .iter()
            .map(|block| {
                let region = MemoryRegion {
                    address,
                    size: block.size(),
                    occupant: block.occupant(),
                };
                address += block.size();
                region
            })
            .collect()
    }

    /// Get overall memory statistics
    pub fn stats(&self) -> MemoryStats {
        let free_blocks = self.blocks.iter().filter(|b| b.is_free()).count();
        let available = self.available_memory();
        let largest_free = self.largest_free_block();

        let usage_percentage = if self.total_memory > 0 {
            (self.used_memory as f64 / self.total_memory as f64) * 100.0
        } else {
            0.0
        };
        let fragmentation_percentage = if available > 0 {
            (1.0 - largest_free as f64 / available as f64) * 100.0
        } else {
            0.0
        };

        MemoryStats {
            total_memory: self.total_memory,
            used_memory: self.used_memory,
            available_memory: available,
            usage_percentage,
            occupied_blocks: self.blocks.len() - free_blocks,
            free_blocks,
            largest_free_block: largest_free,
            fragmentation_percentage,
        }
    }

    /// Sum of every block size; equals total memory while invariants hold
    pub fn accounted_memory(&self) -> usize {
        self.blocks.iter().map(Block::size).sum()
    }
}
