/*!
 * Transition Tests
 * State changes, their memory side effects and compensating transitions
 */

use os_process_sim::memory::{FitStrategy, MemoryError, MemoryManager};
use os_process_sim::process::{
    Event, Fired, ProcessEngine, ProcessFactory, State, StateLimits, StateStore, TransitionError,
};
use pretty_assertions::assert_eq;

fn engine(total_memory: usize) -> ProcessEngine {
    ProcessEngine::new(
        StateStore::new(&StateLimits::default()),
        MemoryManager::with_capacity(total_memory, FitStrategy::Best),
    )
}

fn admit_all(
    engine: &mut ProcessEngine,
    factory: &mut ProcessFactory,
    state: State,
    sizes: &[usize],
) {
    for &size in sizes {
        engine.admit(factory.create(size, 6), state).unwrap();
    }
}

#[test]
fn test_blocked_to_ready_evicts_largest_when_ready_full() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Ready, &[256, 512, 320, 256]);
    admit_all(&mut engine, &mut factory, State::Blocked, &[256]);

    let moved = engine.fire(Event::new(State::Blocked, State::Ready));

    assert_eq!(moved, Ok(5));
    assert_eq!(engine.store().pids_in(State::Ready), vec![1, 3, 4, 5]);
    assert_eq!(engine.store().pids_in(State::Hold), vec![2]);
    assert!(!engine.memory().is_resident(2));
    assert!(engine.memory().is_resident(5));
    assert_eq!(engine.memory().used_memory(), 256 + 320 + 256 + 256);
    assert_eq!(
        engine.last_cascade(),
        &[
            Fired {
                event: Event::new(State::Ready, State::Hold),
                pid: 2,
                depth: 1
            },
            Fired {
                event: Event::new(State::Blocked, State::Ready),
                pid: 5,
                depth: 0
            },
        ]
    );
}

#[test]
fn test_hold_to_ready_allocates_memory() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Hold, &[384]);
    assert_eq!(engine.memory().used_memory(), 0);

    assert_eq!(engine.fire(Event::new(State::Hold, State::Ready)), Ok(1));
    assert_eq!(engine.memory().used_memory(), 384);
    assert_eq!(engine.memory().address_of(1), Some(0));
}

#[test]
fn test_hold_to_ready_without_memory_stays_in_hold() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(512);
    admit_all(&mut engine, &mut factory, State::Ready, &[512]);
    admit_all(&mut engine, &mut factory, State::Hold, &[256, 256]);

    let result = engine.fire(Event::new(State::Hold, State::Ready));

    assert!(matches!(
        result,
        Err(TransitionError::Memory(MemoryError::OutOfMemory { requested: 256, .. }))
    ));
    assert_eq!(engine.store().pids_in(State::Hold), vec![2, 3]);
    assert_eq!(engine.store().pids_in(State::Ready), vec![1]);
    assert!(engine.last_cascade().is_empty());
}

#[test]
fn test_hold_to_ready_has_no_compensation_when_ready_full() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Ready, &[256, 256, 256, 256]);
    admit_all(&mut engine, &mut factory, State::Hold, &[256]);

    assert_eq!(
        engine.fire(Event::new(State::Hold, State::Ready)),
        Err(TransitionError::StateFull {
            state: State::Ready,
            capacity: 4
        })
    );
    assert_eq!(engine.store().pids_in(State::Hold), vec![5]);
    assert!(!engine.memory().is_resident(5));
    assert_eq!(engine.memory().used_memory(), 1024);
}

#[test]
fn test_ready_to_run_preempts_running_process() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Run, &[256]);
    admit_all(&mut engine, &mut factory, State::Ready, &[320]);

    assert_eq!(engine.fire(Event::new(State::Ready, State::Run)), Ok(2));
    assert_eq!(engine.store().pids_in(State::Run), vec![2]);
    assert_eq!(engine.store().pids_in(State::SuspendSystem), vec![1]);
    assert!(engine.memory().is_resident(1));
}

#[test]
fn test_ready_to_run_pulls_from_suspend_system_first() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::SuspendSystem, &[256]);
    admit_all(&mut engine, &mut factory, State::Hold, &[256]);

    assert_eq!(engine.fire(Event::new(State::Ready, State::Run)), Ok(1));
    assert_eq!(engine.store().pids_in(State::Hold), vec![2]);
    assert_eq!(engine.memory().used_memory(), 256);
}

#[test]
fn test_ready_to_run_falls_back_to_hold() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Hold, &[448]);

    assert_eq!(engine.fire(Event::new(State::Ready, State::Run)), Ok(1));
    assert_eq!(engine.store().pids_in(State::Run), vec![1]);
    assert_eq!(engine.memory().used_memory(), 448);
}

#[test]
fn test_ready_to_run_with_nothing_anywhere() {
    let mut engine = engine(2048);
    assert_eq!(
        engine.fire(Event::new(State::Ready, State::Run)),
        Err(TransitionError::NoResidentProcess(State::Ready))
    );
}

#[test]
fn test_run_to_blocked_with_blocked_full() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Blocked, &[256, 256, 256, 256]);
    admit_all(&mut engine, &mut factory, State::Run, &[320]);
    admit_all(&mut engine, &mut factory, State::Ready, &[384]);

    assert_eq!(engine.fire(Event::new(State::Run, State::Blocked)), Ok(5));

    assert_eq!(engine.store().pids_in(State::Done), vec![1]);
    assert_eq!(engine.store().pids_in(State::Blocked), vec![2, 3, 4, 5]);
    assert_eq!(engine.store().pids_in(State::Run), vec![6]);
    assert!(engine.store().is_empty(State::Ready));
    assert!(!engine.memory().is_resident(1));
}

#[test]
fn test_suspend_refills_cpu() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Run, &[256]);
    admit_all(&mut engine, &mut factory, State::Ready, &[256, 320]);

    assert_eq!(engine.fire(Event::new(State::Run, State::SuspendUser)), Ok(1));
    assert_eq!(engine.store().pids_in(State::SuspendUser), vec![1]);
    assert_eq!(engine.store().pids_in(State::Run), vec![2]);
    assert_eq!(engine.store().pids_in(State::Ready), vec![3]);
}

#[test]
fn test_done_frees_memory() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::SuspendUser, &[512]);

    assert_eq!(engine.fire(Event::new(State::SuspendUser, State::Done)), Ok(1));
    assert_eq!(engine.memory().used_memory(), 0);
    assert_eq!(engine.memory().blocks().len(), 1);
}

#[test]
fn test_change_state_does_not_compensate() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Ready, &[256, 256, 256, 256]);
    admit_all(&mut engine, &mut factory, State::Blocked, &[256]);

    assert_eq!(
        engine.change_state(Event::new(State::Blocked, State::Ready)),
        Err(TransitionError::StateFull {
            state: State::Ready,
            capacity: 4
        })
    );
    assert!(engine.store().is_empty(State::Hold));
    assert_eq!(engine.store().pids_in(State::Blocked), vec![5]);
}

#[test]
fn test_admit_rejects_terminal_state() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);

    assert_eq!(
        engine.admit(factory.create(256, 3), State::Done),
        Err(TransitionError::TerminalState(State::Done))
    );
    assert_eq!(engine.store().process_count(), 0);
}

#[test]
fn test_run_to_blocked_with_idle_cpu_kills_nothing() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Blocked, &[256, 256, 256, 256]);

    assert_eq!(
        engine.fire(Event::new(State::Run, State::Blocked)),
        Err(TransitionError::NoResidentProcess(State::Run))
    );
    assert!(engine.store().is_empty(State::Done));
    assert_eq!(engine.store().pids_in(State::Blocked), vec![1, 2, 3, 4]);
    assert_eq!(engine.memory().used_memory(), 1024);
    assert!(engine.last_cascade().is_empty());
}

#[test]
fn test_ready_from_empty_source_evicts_nothing() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Ready, &[256, 512, 320, 256]);

    for source in [State::Blocked, State::SuspendUser, State::SuspendSystem] {
        assert_eq!(
            engine.fire(Event::new(source, State::Ready)),
            Err(TransitionError::NoResidentProcess(source))
        );
    }
    assert_eq!(engine.store().pids_in(State::Ready), vec![1, 2, 3, 4]);
    assert!(engine.store().is_empty(State::Hold));
    assert!(engine.memory().is_resident(2));
    assert!(engine.last_cascade().is_empty());
}

#[test]
fn test_ready_to_run_without_successor_keeps_cpu_busy() {
    let mut factory = ProcessFactory::new();
    let mut engine = engine(2048);
    admit_all(&mut engine, &mut factory, State::Run, &[256]);

    assert_eq!(
        engine.fire(Event::new(State::Ready, State::Run)),
        Err(TransitionError::NoResidentProcess(State::Ready))
    );
    assert_eq!(engine.store().pids_in(State::Run), vec![1]);
    assert!(engine.store().is_empty(State::SuspendSystem));
    assert!(engine.last_cascade().is_empty());
}
