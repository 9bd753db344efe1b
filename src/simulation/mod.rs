/*!
 * Simulation Module
 * Driver loop, configuration and the collaborators around the core engines
 */

pub mod config;
pub mod driver;
pub mod events;
pub mod generator;
pub mod report;
pub mod snapshot;

// Re-export for convenience
pub use config::{ConfigError, ConfigResult, InitialJobs, SimulationConfig};
pub use driver::Simulation;
pub use events::{sample_event, LEGAL_EVENTS};
pub use generator::{ProcessGenerator, SteppedRange};
pub use report::{RunReport, StepOutcome, StopReason};
pub use snapshot::{StateSnapshot, SystemSnapshot};
