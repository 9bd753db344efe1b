/*!
 * Fit Strategy Tests
 * Block selection under first, best and worst fit
 */

use os_process_sim::memory::{FitStrategy, MemoryManager};
use os_process_sim::process::{Process, ProcessFactory};
use pretty_assertions::assert_eq;

/// Memory laid out as free(100) | 10 | free(400) | 10 | free(250)
fn fragmented(strategy: FitStrategy) -> (MemoryManager, ProcessFactory) {
    let mut factory = ProcessFactory::new();
    let mut manager = MemoryManager::with_capacity(770, FitStrategy::First);
    let layout: Vec<Process> = [100, 10, 400, 10, 250]
        .iter()
        .map(|&size| factory.create(size, 3))
        .collect();
    for process in &layout {
        manager.allocate(process).unwrap();
    }
    for index in [0, 2, 4] {
        manager.free(&layout[index]).unwrap();
    }
    manager.set_strategy(strategy);
    (manager, factory)
}

#[test]
fn test_fragmented_layout() {
    let (manager, _) = fragmented(FitStrategy::First);
    let free: Vec<(usize, usize)> = manager
        .memory_map()
        .into_iter()
        .filter(|region| region.occupant.is_none())
        .map(|region| (region.address, region.size))
        .collect();
    assert_eq!(free, vec![(0, 100), (110, 400), (520, 250)]);
}

#[test]
fn test_first_fit_takes_first_sufficient_block() {
    let (mut manager, mut factory) = fragmented(FitStrategy::First);
    assert_eq!(manager.allocate(&factory.create(100, 3)).unwrap(), 0);
    assert_eq!(manager.allocate(&factory.create(200, 3)).unwrap(), 110);
}

#[test]
fn test_best_fit_takes_smallest_sufficient_block() {
    let (mut manager, mut factory) = fragmented(FitStrategy::Best);
    assert_eq!(manager.allocate(&factory.create(100, 3)).unwrap(), 0);
    assert_eq!(manager.allocate(&factory.create(200, 3)).unwrap(), 520);
}

#[test]
fn test_worst_fit_takes_largest_block() {
    let (mut manager, mut factory) = fragmented(FitStrategy::Worst);
    assert_eq!(manager.allocate(&factory.create(100, 3)).unwrap(), 110);
}

#[test]
fn test_ties_break_by_lowest_address() {
    let mut factory = ProcessFactory::new();
    for strategy in FitStrategy::ALL {
        let mut manager = MemoryManager::with_capacity(310, FitStrategy::First);
        let layout: Vec<Process> = [150, 10, 150].iter().map(|&s| factory.create(s, 3)).collect();
        for process in &layout {
            manager.allocate(process).unwrap();
        }
        manager.free(&layout[0]).unwrap();
        manager.free(&layout[2]).unwrap();
        manager.set_strategy(strategy);

        assert_eq!(
            manager.allocate(&factory.create(100, 3)).unwrap(),
            0,
            "{strategy} fit should pick the lower address on a tie"
        );
    }
}

#[test]
fn test_strategy_names_parse() {
    for strategy in FitStrategy::ALL {
        assert_eq!(strategy.to_string().parse::<FitStrategy>(), Ok(strategy));
    }
    assert!("next".parse::<FitStrategy>().is_err());
}
