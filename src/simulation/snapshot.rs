/*!
 * System Snapshots
 * Serializable view of every state and the memory map after a step
 */

use crate::memory::{Allocator, MemoryInfo, MemoryRegion, MemoryStats};
use crate::process::{Process, ProcessEngine, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Residents of one state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub residents: Vec<Process>,
}

/// Full observable system state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub step: u64,
    pub states: Vec<StateSnapshot>,
    pub memory: Vec<MemoryRegion>,
    pub stats: MemoryStats,
}

impl SystemSnapshot {
    pub fn capture<A>(step: u64, engine: &ProcessEngine<A>) -> Self
    where
        A: Allocator + MemoryInfo,
    {
        let store = engine.store();
        let states = State::ALL
            .iter()
            .map(|&state| StateSnapshot {
                state,
                capacity: store.capacity_of(state),
                residents: store.all_of(state).cloned().collect(),
            })
            .collect();

        Self {
            step,
            states,
            memory: engine.memory().memory_map(),
            stats: engine.memory().stats(),
        }
    }

    pub fn residents(&self, state: State) -> &[Process] {
        self.states
            .iter()
            .find(|snapshot| snapshot.state == state)
            .map(|snapshot| snapshot.residents.as_slice())
            .unwrap_or(&[])
    }
}

impl fmt::Display for SystemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "step {}", self.step)?;
        for snapshot in &self.states {
            let residents: Vec<String> =
                snapshot.residents.iter().map(ToString::to_string).collect();
            match snapshot.capacity {
                Some(capacity) => write!(
                    f,
                    "  {:<15}{}/{}",
                    snapshot.state.name(),
                    snapshot.residents.len(),
                    capacity
                )?,
                None => write!(f, "  {:<15}{}", snapshot.state.name(), snapshot.residents.len())?,
            }
            writeln!(f, "  [{}]", residents.join(", "))?;
        }
        writeln!(
            f,
            "  memory: {}k used / {}k ({:.1}% fragmented)",
            self.stats.used_memory, self.stats.total_memory, self.stats.fragmentation_percentage
        )?;
        for region in &self.memory {
            writeln!(f, "    {region}")?;
        }
        Ok(())
    }
}
