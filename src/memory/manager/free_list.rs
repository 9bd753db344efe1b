/*!
 * Free Block Search
 * Fit-strategy selection and coalescing over the block list
 */

use super::MemoryManager;
use crate::memory::types::{Block, FitStrategy};
use crate::core::types::Size;

impl FitStrategy {
    /// Pick a candidate among `(index, free size)` pairs given in address order.
    /// Ties on size resolve to the earliest address.
    pub fn select<I>(self, candidates: I, request: Size) -> Option<usize>
    where
        I: IntoIterator<Item = (usize, Size)>,
    {
        let mut fitting = candidates
            .into_iter()
            .filter(|&(_, size)| size >= request);

        let chosen = match self {
            FitStrategy::First => fitting.next(),
            FitStrategy::Best => fitting.fold(None, |best, candidate| match best {
                Some((_, size)) if size <= candidate.1 => best,
                _ => Some(candidate),
            }),
            FitStrategy::Worst => fitting.fold(None, |worst, candidate| match worst {
                Some((_, size)) if size >= candidate.1 => worst,
                _ => Some(candidate),
            }),
        };

        chosen.map(|(index, _)| index)
    }
}

impl MemoryManager {
    /// Index of the free block the active strategy would use for `size`
    pub(super) fn find_fitting_block(&self, size: Size) -> Option<usize> {
        let free_blocks = self
            .blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| block.as_free().map(|free| (index, free.size())));
        self.strategy.select(free_blocks, size)
    }

    pub(super) fn largest_free_block(&self) -> Size {
        self.blocks
            .iter()
            .filter_map(Block::as_free)
            .map(|free| free.size())
            .max()
            .unwrap_or(0)
    }

    /// Merge every run of adjacent free blocks into one block.
    /// Returns how many blocks were absorbed.
    pub(super) fn coalesce_free_blocks(&mut self) -> usize {
        let before = self.blocks.len();
        let mut merged: Vec<Block> = Vec::with_capacity(before);

        for block in std::mem::take(&mut self.blocks) {
            if let Block::Free(next) = block {
                if let Some(Block::Free(previous)) = merged.last_mut() {
                    previous.merge(next);
                    continue;
                }
            }
            merged.push(block);
        }

        self.blocks = merged;
        before - self.blocks.len()
    }
}
