/*!
 * Simulation Driver
 *
 * Step-wise discrete-event loop around the process engine. Each step first
 * credits CPU time to the running process (terminating it when finished),
 * then samples one legal event and fires it.
 */

use super::config::SimulationConfig;
use super::events::sample_event;
use super::generator::ProcessGenerator;
use super::report::{RunReport, StepOutcome, StopReason};
use super::snapshot::SystemSnapshot;
use crate::core::types::{Pid, SimResult};
use crate::memory::MemoryManager;
use crate::process::{Event, ProcessEngine, ProcessFactory, State, StateStore, TransitionResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

/// A configured simulation run
pub struct Simulation<R = StdRng> {
    config: SimulationConfig,
    engine: ProcessEngine<MemoryManager>,
    factory: ProcessFactory,
    generator: ProcessGenerator,
    rng: R,
    step: u64,
    report: RunReport,
}

impl Simulation<StdRng> {
    /// Build a simulation seeded from the config, or from entropy when unseeded
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build a simulation with an explicit random source and load the
    /// initial conditions
    pub fn with_rng(config: SimulationConfig, rng: R) -> SimResult<Self> {
        config.validate()?;

        let store = StateStore::new(&config.state_limits);
        let memory = MemoryManager::with_capacity(config.total_memory, config.fit_strategy);
        let generator = ProcessGenerator::new(config.process_size, config.process_time);

        let mut simulation = Self {
            engine: ProcessEngine::new(store, memory),
            factory: ProcessFactory::new(),
            generator,
            rng,
            step: 0,
            report: RunReport::default(),
            config,
        };
        simulation.load_initial_conditions()?;
        Ok(simulation)
    }

    fn load_initial_conditions(&mut self) -> SimResult<()> {
        let jobs = self.config.initial_jobs.clone();
        for state in jobs.states {
            let job = self.factory.create(jobs.size, jobs.cpu_required);
            info!(pid = job.pid(), %state, process = %job, "initial job created");
            self.engine.admit(job, state)?;
        }

        for _ in 0..self.config.initial_held {
            let job = self.generator.generate(&mut self.factory, &mut self.rng);
            info!(pid = job.pid(), process = %job, "held job created");
            self.engine.admit(job, State::Hold)?;
        }

        self.report.processes = self.engine.store().process_count();
        Ok(())
    }

    /// Run one step: CPU tick, then one sampled event
    pub fn step(&mut self) -> StepOutcome {
        self.step += 1;
        self.report.steps = self.step;

        let cpu = self.engine.tick(self.config.cpu_quantum);
        if let Some(tick) = &cpu {
            trace!(pid = tick.pid, credited = tick.credited, "cpu tick");
            self.report.record_tick(tick);
        }

        let event = sample_event(&mut self.rng);
        let result = self.fire(event);

        StepOutcome {
            step: self.step,
            cpu,
            event,
            result,
            cascade: self.engine.last_cascade().to_vec(),
        }
    }

    /// Fire a specific event with compensation and record the outcome
    pub fn fire(&mut self, event: Event) -> TransitionResult<Pid> {
        let result = self.engine.fire(event);
        match &result {
            Ok(pid) => debug!(step = self.step, pid, %event, "event succeeded"),
            Err(err) => debug!(step = self.step, %event, error = %err, "event failed"),
        }
        self.report.record_event(&result, self.engine.last_cascade());
        result
    }

    /// Run until every process is done or the event ceiling is reached
    pub fn run(&mut self) -> &RunReport {
        self.run_with(|_, _| {})
    }

    /// Run, handing every step outcome to `observe`
    pub fn run_with<F>(&mut self, mut observe: F) -> &RunReport
    where
        F: FnMut(&Self, &StepOutcome),
    {
        info!(
            max_events = self.config.max_events,
            fit = %self.config.fit_strategy,
            processes = self.report.processes,
            "simulation starting"
        );

        let reason = loop {
            if self.engine.store().all_done() {
                break StopReason::AllDone;
            }
            if self.report.events_fired >= self.config.max_events {
                break StopReason::EventLimit;
            }
            let outcome = self.step();
            observe(self, &outcome);
        };

        self.report.stop_reason = Some(reason);
        self.report.processes_done = self.engine.store().count_in(State::Done);
        info!(
            steps = self.report.steps,
            succeeded = self.report.events_succeeded,
            failed = self.report.events_failed,
            done = self.report.processes_done,
            "simulation stopped: {}",
            reason
        );
        &self.report
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot::capture(self.step, &self.engine)
    }

    pub fn engine(&self) -> &ProcessEngine<MemoryManager> {
        &self.engine
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }
}
