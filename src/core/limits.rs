/*!
 * System Limits and Constants
 *
 * Centralized location for the reference configuration of the simulator.
 * Every value here is only a default: `SimulationConfig` injects the
 * effective values into the core at construction time.
 */

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Total simulated user memory (KB)
pub const DEFAULT_TOTAL_MEMORY: usize = 2048;

// =============================================================================
// STATE CAPACITIES
// =============================================================================

/// Ready queue capacity
pub const DEFAULT_READY_CAPACITY: usize = 4;

/// Single CPU: at most one process runs at a time
pub const DEFAULT_RUN_CAPACITY: usize = 1;

/// Blocked queue capacity
pub const DEFAULT_BLOCKED_CAPACITY: usize = 4;

// =============================================================================
// CPU / DRIVER LIMITS
// =============================================================================

/// CPU units credited to the running process per step
pub const DEFAULT_CPU_QUANTUM: u32 = 3;

/// Maximum number of events fired before the run stops
pub const DEFAULT_MAX_EVENTS: u64 = 500;

/// Upper bound on nested compensating transitions.
/// The rule table never nests deeper than four; anything beyond this is
/// treated as "compensation unavailable".
pub const MAX_CASCADE_DEPTH: u8 = 8;

// =============================================================================
// PROCESS GENERATION
// =============================================================================

/// Random process memory size domain (KB)
pub const MIN_PROCESS_SIZE: usize = 256;
pub const MAX_PROCESS_SIZE: usize = 1024;
pub const PROCESS_SIZE_STEP: usize = 64;

/// Random process CPU requirement domain
pub const MIN_PROCESS_TIME: u32 = 3;
pub const MAX_PROCESS_TIME: u32 = 15;
pub const PROCESS_TIME_STEP: u32 = 3;

/// Initially active jobs (memory-resident at start)
pub const INITIAL_JOB_SIZE: usize = 320;
pub const INITIAL_JOB_TIME: u32 = 6;

/// Initially held jobs (no memory at start)
pub const INITIAL_HELD_JOBS: usize = 10;
