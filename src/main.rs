/*!
 * Process Simulator - Main Entry Point
 *
 * Runs the randomized process lifecycle simulation and prints the run report
 * as JSON on stdout. Logs go to stderr.
 */

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use os_process_sim::{
    init_tracing, FitStrategy, MemoryInfo, Simulation, SimulationConfig, TracingOptions,
};

/// Process lifecycle and memory allocation simulator
#[derive(Parser, Debug)]
#[command(name = "procsim", version, long_about = None)]
struct Args {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Placement strategy: first, best or worst
    #[arg(short, long)]
    fit: Option<FitStrategy>,

    /// Maximum number of random events to fire
    #[arg(long)]
    max_events: Option<u64>,

    /// CPU time credited to the running process per step
    #[arg(short, long)]
    quantum: Option<u32>,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a JSON snapshot of every state and the memory map after each step
    #[arg(long, default_value_t = false)]
    snapshots: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<SimulationConfig> {
        let config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        let mut config = config.apply_env().context("applying PROCSIM_* overrides")?;

        if let Some(fit) = self.fit {
            config.fit_strategy = fit;
        }
        if let Some(max_events) = self.max_events {
            config.max_events = max_events;
        }
        if let Some(quantum) = self.quantum {
            config.cpu_quantum = quantum;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(TracingOptions {
        debug: args.debug,
        json: args.json,
    })
    .context("initializing tracing")?;

    let config = args.load_config()?;
    info!(
        fit = %config.fit_strategy,
        total_memory = config.total_memory,
        max_events = config.max_events,
        quantum = config.cpu_quantum,
        "Starting simulation"
    );

    let mut simulation = Simulation::new(config)?;

    let report = if args.snapshots {
        simulation
            .run_with(|sim, _| match serde_json::to_string(&sim.snapshot()) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to serialize snapshot"),
            })
            .clone()
    } else {
        simulation.run().clone()
    };

    let memory = simulation.engine().memory();
    for region in memory.memory_map() {
        info!("{}", region);
    }
    let stats = memory.stats();
    info!(
        used = stats.used_memory,
        free_blocks = stats.free_blocks,
        fragmentation_pct = stats.fragmentation_percentage,
        pressure = %memory.pressure(),
        "Final memory layout"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
