//! Memory of situations in which the agent got stuck.

use std::collections::HashMap;

use crate::env::AgentEnv;
use crate::geometry::Vec2;

/// Discretized situation: rounded position plus nearby entity counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailureContextKey {
    pub cell_x: i32,
    pub cell_y: i32,
    pub enemies: u32,
    pub items: u32,
    pub npcs: u32,
}

impl FailureContextKey {
    pub fn new(position: Vec2, enemies: usize, items: usize, npcs: usize) -> Self {
        Self {
            cell_x: position.x.round() as i32,
            cell_y: position.y.round() as i32,
            enemies: enemies as u32,
            items: items as u32,
            npcs: npcs as u32,
        }
    }

    /// Key for the situation the environment currently reports.
    pub fn observe(env: &AgentEnv) -> Self {
        let (enemies, items, npcs) = env
            .perception()
            .map(|p| (p.enemy_count(), p.item_count(), p.npc_count()))
            .unwrap_or((0, 0, 0));
        Self::new(env.position(), enemies, items, npcs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailureRecord {
    pub count: u32,
    /// Monitor clock (seconds) of the latest failure.
    pub last_observed: f32,
}

/// Unbounded failure counts keyed by situation.
#[derive(Clone, Debug, Default)]
pub struct FailureMemory {
    records: HashMap<FailureContextKey, FailureRecord>,
}

impl FailureMemory {
    /// Counts one more failure in `key` and returns the updated record.
    pub fn record(&mut self, key: FailureContextKey, now: f32) -> FailureRecord {
        let entry = self.records.entry(key).or_insert(FailureRecord {
            count: 0,
            last_observed: now,
        });
        entry.count += 1;
        entry.last_observed = now;
        *entry
    }

    pub fn has_failed(&self, key: &FailureContextKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn count(&self, key: &FailureContextKey) -> u32 {
        self.records.get(key).map(|r| r.count).unwrap_or(0)
    }

    pub fn get(&self, key: &FailureContextKey) -> Option<&FailureRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
