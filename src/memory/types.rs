/*!
 * Memory Types
 * Common types for memory management
 */

use crate::core::types::{Address, Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Out of memory: requested {requested}k, largest free block {largest_free}k ({available}k available)")]
    #[diagnostic(
        code(memory::out_of_memory),
        help("No free block is large enough under the active fit strategy. Free resident processes first.")
    )]
    OutOfMemory {
        requested: Size,
        largest_free: Size,
        available: Size,
    },

    #[error("Process {0} is not resident in memory")]
    #[diagnostic(
        code(memory::not_found),
        help("Only processes that were allocated a block can be freed.")
    )]
    NotFound(Pid),

    #[error("Process {0} is already resident in memory")]
    #[diagnostic(
        code(memory::already_resident),
        help("A process occupies at most one block. Free it before allocating again.")
    )]
    AlreadyResident(Pid),
}

/// Block selection policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// First free block (by address) that is large enough
    First,
    /// Smallest sufficient free block, earliest address on ties
    #[default]
    Best,
    /// Largest sufficient free block, earliest address on ties
    Worst,
}

impl FitStrategy {
    pub const ALL: [FitStrategy; 3] = [FitStrategy::First, FitStrategy::Best, FitStrategy::Worst];
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStrategy::First => write!(f, "first"),
            FitStrategy::Best => write!(f, "best"),
            FitStrategy::Worst => write!(f, "worst"),
        }
    }
}

/// Unknown fit strategy name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown fit strategy '{0}' (expected first, best or worst)")]
pub struct ParseFitStrategyError(pub String);

impl FromStr for FitStrategy {
    type Err = ParseFitStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(FitStrategy::First),
            "best" => Ok(FitStrategy::Best),
            "worst" => Ok(FitStrategy::Worst),
            _ => Err(ParseFitStrategyError(s.to_string())),
        }
    }
}

/// Unoccupied extent. The only block kind that can change size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBlock {
    size: Size,
}

impl FreeBlock {
    pub fn new(size: Size) -> Self {
        Self { size }
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, new_size: Size) {
        self.size = new_size;
    }

    /// Absorb an adjacent free block
    pub fn merge(&mut self, next: FreeBlock) {
        self.resize(self.size + next.size);
    }

    /// Carve an occupied block of `size` from the front of this extent.
    /// Returns `None` when the extent is too small.
    pub fn carve(self, pid: Pid, size: Size) -> Option<(OccupiedBlock, Option<FreeBlock>)> {
        let remainder = self.size.checked_sub(size)?;
        let occupied = OccupiedBlock { pid, size };
        let rest = (remainder > 0).then(|| FreeBlock::new(remainder));
        Some((occupied, rest))
    }
}

/// Extent held by one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedBlock {
    pid: Pid,
    size: Size,
}

impl OccupiedBlock {
    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Release the extent, keeping its size
    pub fn release(self) -> FreeBlock {
        FreeBlock::new(self.size)
    }
}

/// Memory block in the address-ordered block list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Free(FreeBlock),
    Occupied(OccupiedBlock),
}

impl Block {
    #[inline]
    pub fn size(&self) -> Size {
        match self {
            Block::Free(block) => block.size(),
            Block::Occupied(block) => block.size(),
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, Block::Free(_))
    }

    #[inline]
    pub fn occupant(&self) -> Option<Pid> {
        match self {
            Block::Free(_) => None,
            Block::Occupied(block) => Some(block.pid()),
        }
    }

    #[inline]
    pub fn as_free(&self) -> Option<&FreeBlock> {
        match self {
            Block::Free(block) => Some(block),
            Block::Occupied(_) => None,
        }
    }
}

/// One entry of the memory map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub address: Address,
    pub size: Size,
    pub occupant: Option<Pid>,
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occupant {
            Some(pid) => write!(f, "[{:>5}] #{} {}k", self.address, pid, self.size),
            None => write!(f, "[{:>5}] free {}k", self.address, self.size),
        }
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub usage_percentage: f64,
    pub occupied_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    /// Share of free memory outside the largest free block
    pub fragmentation_percentage: f64,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_usage(self.usage_percentage)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_usage(usage_percentage: f64) -> Self {
        if usage_percentage >= 95.0 {
            MemoryPressure::Critical
        } else if usage_percentage >= 80.0 {
            MemoryPressure::High
        } else if usage_percentage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
