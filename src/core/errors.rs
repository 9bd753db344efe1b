/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors
pub use crate::memory::MemoryError;
pub use crate::process::{StoreError, TransitionError};
pub use crate::simulation::ConfigError;

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("State store error: {0}")]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("Transition error: {0}")]
    #[diagnostic(transparent)]
    Transition(#[from] TransitionError),
}
