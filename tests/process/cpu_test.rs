/*!
 * CPU Tests
 * Quantum crediting and automatic termination of the running process
 */

use os_process_sim::memory::{FitStrategy, MemoryManager};
use os_process_sim::process::{
    Event, Fired, ProcessEngine, ProcessFactory, State, StateLimits, StateStore,
};
use pretty_assertions::assert_eq;

fn engine() -> ProcessEngine {
    ProcessEngine::new(
        StateStore::new(&StateLimits::default()),
        MemoryManager::with_capacity(2048, FitStrategy::Best),
    )
}

#[test]
fn test_finished_process_terminates_and_cpu_is_backfilled() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine();
    engine.admit(factory.create(320, 6), State::Run).unwrap();
    engine.admit(factory.create(256, 9), State::Ready).unwrap();

    let first = engine.tick(3).expect("a process is running");
    assert_eq!((first.pid, first.credited, first.finished), (1, 3, false));
    assert_eq!(first.termination, None);
    assert!(first.cascade.is_empty());

    let second = engine.tick(3).expect("a process is running");
    assert!(second.finished);
    assert_eq!(second.termination, Some(Ok(1)));
    assert_eq!(
        second.cascade,
        vec![
            Fired {
                event: Event::new(State::Run, State::Done),
                pid: 1,
                depth: 0
            },
            Fired {
                event: Event::new(State::Ready, State::Run),
                pid: 2,
                depth: 1
            },
        ]
    );

    let done = engine.store().get(1).expect("process 1 still tracked");
    assert_eq!(done.cpu_used(), 6);
    assert_eq!(engine.store().state_of(1), Some(State::Done));
    assert!(!engine.memory().is_resident(1));
    assert_eq!(engine.store().pids_in(State::Run), vec![2]);
    assert_eq!(engine.memory().used_memory(), 256);
}

#[test]
fn test_finished_process_with_empty_ready_leaves_cpu_idle() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine();
    engine.admit(factory.create(320, 3), State::Run).unwrap();

    let tick = engine.tick(3).expect("a process is running");
    assert!(tick.finished);
    assert!(engine.store().is_empty(State::Run));
    assert!(engine.store().all_done());
    assert_eq!(engine.memory().used_memory(), 0);
}

#[test]
fn test_credit_is_capped_at_requirement() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine();
    engine.admit(factory.create(256, 4), State::Run).unwrap();

    engine.tick(3);
    let tick = engine.tick(3).expect("a process is running");
    assert_eq!(tick.credited, 1);
    assert_eq!(engine.store().get(1).map(|p| p.cpu_used()), Some(4));
}

#[test]
fn test_idle_cpu_does_nothing() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine();
    engine.admit(factory.create(256, 6), State::Ready).unwrap();

    assert_eq!(engine.tick(3), None);
    assert_eq!(engine.store().get(1).map(|p| p.cpu_used()), Some(0));
}
