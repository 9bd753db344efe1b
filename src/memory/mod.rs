/*!
 * Memory Module
 * Contiguous block allocation with pluggable fit strategies
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::MemoryManager;
pub use traits::*;
pub use types::*;
