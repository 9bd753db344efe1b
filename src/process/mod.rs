/*!
 * Process Module
 * Process records, state storage and the transition engine
 */

pub mod engine;
pub mod factory;
pub mod record;
pub mod store;
pub mod types;

// Re-export for convenience
pub use engine::{CpuTick, Fired, ProcessEngine};
pub use factory::ProcessFactory;
pub use record::Process;
pub use store::{Rejected, StateStore};
pub use types::*;
