/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations (offset from the start of user memory)
pub type Address = usize;

/// Size type for memory operations (KB units)
pub type Size = usize;

/// CPU time units
pub type CpuTime = u32;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
