/*!
 * State Store Tests
 * FIFO placement, capacity limits and membership tracking
 */

use os_process_sim::process::{ProcessFactory, State, StateLimits, StateStore, StoreError};
use pretty_assertions::assert_eq;

#[test]
fn test_place_preserves_insertion_order() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::default();

    for _ in 0..3 {
        store.place(factory.create(256, 3), State::Blocked).unwrap();
    }

    assert_eq!(store.pids_in(State::Blocked), vec![1, 2, 3]);
    assert_eq!(store.first_of(State::Blocked).map(|p| p.pid()), Some(1));
    assert_eq!(store.count_in(State::Blocked), 3);
}

#[test]
fn test_capacity_is_enforced() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::new(&StateLimits::unbounded().with_limit(State::Ready, 2));

    store.place(factory.create(256, 3), State::Ready).unwrap();
    store.place(factory.create(256, 3), State::Ready).unwrap();
    assert!(store.is_full(State::Ready));

    let rejected = store.place(factory.create(512, 3), State::Ready).unwrap_err();
    let (process, error) = rejected.into_parts();
    assert_eq!(process.pid(), 3);
    assert_eq!(
        error,
        StoreError::StateFull {
            state: State::Ready,
            capacity: 2
        }
    );
    assert_eq!(store.state_of(3), None);
    assert_eq!(store.count_in(State::Ready), 2);
}

#[test]
fn test_uncapacitated_states_never_fill() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::default();

    for _ in 0..50 {
        store.place(factory.create(256, 3), State::Hold).unwrap();
    }
    assert_eq!(store.capacity_of(State::Hold), None);
    assert!(!store.is_full(State::Hold));
    assert_eq!(store.count_in(State::Hold), 50);
}

#[test]
fn test_remove_requires_membership() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::default();
    store.place(factory.create(256, 3), State::Ready).unwrap();
    store.place(factory.create(320, 3), State::Ready).unwrap();

    assert_eq!(
        store.remove(1, State::Blocked),
        Err(StoreError::NotResident {
            pid: 1,
            state: State::Blocked
        })
    );

    let removed = store.remove(2, State::Ready).unwrap();
    assert_eq!(removed.size(), 320);
    assert_eq!(store.pids_in(State::Ready), vec![1]);
    assert_eq!(store.state_of(2), None);
}

#[test]
fn test_process_lives_in_one_state() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::default();
    let process = factory.create(256, 3);
    store.place(process.clone(), State::Ready).unwrap();

    let (_, error) = store.place(process, State::Blocked).unwrap_err().into_parts();
    assert_eq!(
        error,
        StoreError::DuplicateProcess {
            pid: 1,
            state: State::Ready
        }
    );
    assert_eq!(store.state_of(1), Some(State::Ready));
    assert_eq!(store.process_count(), 1);
}

#[test]
fn test_largest_prefers_earliest_on_ties() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::default();
    for size in [256, 512, 384, 512] {
        store.place(factory.create(size, 3), State::Ready).unwrap();
    }

    assert_eq!(store.largest_in(State::Ready).map(|p| p.pid()), Some(2));
    assert_eq!(store.largest_in(State::Blocked), None);
}

#[test]
fn test_all_done() {
    let mut factory = ProcessFactory::new();
    let mut store = StateStore::default();
    assert!(store.all_done());

    store.place(factory.create(256, 3), State::Done).unwrap();
    assert!(store.all_done());

    store.place(factory.create(256, 3), State::Hold).unwrap();
    assert!(!store.all_done());
}
