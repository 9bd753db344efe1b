/*!
 * Process Generator
 * Random process attributes drawn from stepped ranges
 */

use crate::core::limits::{
    MAX_PROCESS_SIZE, MAX_PROCESS_TIME, MIN_PROCESS_SIZE, MIN_PROCESS_TIME, PROCESS_SIZE_STEP,
    PROCESS_TIME_STEP,
};
use crate::process::{Process, ProcessFactory};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range sampled in fixed steps: `min + step * n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppedRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl SteppedRange {
    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    /// Number of distinct values in the range
    pub fn slots(&self) -> u32 {
        (self.max - self.min) / self.step + 1
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.min + self.step * rng.gen_range(0..self.slots())
    }

    /// Reason the range is unusable, if any
    pub fn problem(&self) -> Option<&'static str> {
        if self.step == 0 {
            Some("step must be positive")
        } else if self.min == 0 {
            Some("minimum must be positive")
        } else if self.min > self.max {
            Some("minimum exceeds maximum")
        } else {
            None
        }
    }
}

/// Draws process sizes and CPU requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessGenerator {
    pub size: SteppedRange,
    pub time: SteppedRange,
}

impl ProcessGenerator {
    pub fn new(size: SteppedRange, time: SteppedRange) -> Self {
        Self { size, time }
    }

    pub fn generate<R: Rng + ?Sized>(&self, factory: &mut ProcessFactory, rng: &mut R) -> Process {
        let size = self.size.sample(rng) as usize;
        let time = self.time.sample(rng);
        factory.create(size, time)
    }
}

impl Default for ProcessGenerator {
    fn default() -> Self {
        Self::new(
            SteppedRange::new(MIN_PROCESS_SIZE as u32, MAX_PROCESS_SIZE as u32, PROCESS_SIZE_STEP as u32),
            SteppedRange::new(MIN_PROCESS_TIME, MAX_PROCESS_TIME, PROCESS_TIME_STEP),
        )
    }
}
