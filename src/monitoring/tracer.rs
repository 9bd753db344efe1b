/*!
 * Structured Tracing
 * Subscriber setup for the simulator's tracing and log output
 *
 * Records emitted through the `log` facade (the memory manager) are bridged
 * into the same subscriber.
 */

use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

/// Output options for [`init_tracing`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOptions {
    /// Default to `debug` instead of `info` when RUST_LOG is unset
    pub debug: bool,
    /// Emit JSON lines instead of compact human-readable output
    pub json: bool,
}

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info, or debug with `options.debug`)
pub fn init_tracing(options: TracingOptions) -> Result<(), TryInitError> {
    let default_level = if options.debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if options.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
        info!("Structured tracing initialized");
    }

    Ok(())
}
