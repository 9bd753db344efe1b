/*!
 * OS Process Simulator Library
 *
 * Process lifecycle state engine coupled with a contiguous memory allocator.
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod simulation;

// Re-exports
pub use crate::core::errors::SimError;
pub use crate::core::types::{Address, CpuTime, Pid, SimResult, Size};
pub use memory::{Allocator, FitStrategy, MemoryError, MemoryInfo, MemoryManager, MemoryStats};
pub use monitoring::{init_tracing, TracingOptions};
pub use process::{
    Event, Process, ProcessEngine, ProcessFactory, State, StateLimits, StateStore, StoreError,
    TransitionError,
};
pub use simulation::{ConfigError, RunReport, Simulation, SimulationConfig, SystemSnapshot};
