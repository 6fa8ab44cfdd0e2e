//! In-memory collaborators for tests, tools and simple hosts.
//!
//! Each type keeps its state behind a lock so a host can mutate it between
//! ticks while the agent holds a shared handle. Poisoned locks are recovered
//! rather than propagated; the data they guard is plain values.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    CurrencyProvider, ExplorationMemory, InventoryProvider, MoodDimension, MovementController,
    PerceptionProvider, RewardSink, Sighting, SlotView, StatsProvider,
};
use crate::geometry::Vec2;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Stats
// ============================================================================

/// Plain stat values backing [`InMemoryStats`].
#[derive(Clone, Debug, PartialEq)]
pub struct StatsState {
    pub health: f32,
    pub max_health: f32,
    pub hunger: f32,
    pub max_hunger: f32,
    pub thirst: f32,
    pub max_thirst: f32,
    pub social_mood: f32,
    pub comfort_mood: f32,
    pub safety_mood: f32,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            hunger: 100.0,
            max_hunger: 100.0,
            thirst: 100.0,
            max_thirst: 100.0,
            social_mood: 0.0,
            comfort_mood: 0.0,
            safety_mood: 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStats {
    state: RwLock<StatsState>,
}

impl InMemoryStats {
    pub fn new(state: StatsState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Stats with maxima of 100 and the given current values.
    pub fn with_levels(health: f32, hunger: f32, thirst: f32) -> Self {
        Self::new(StatsState {
            health,
            hunger,
            thirst,
            ..StatsState::default()
        })
    }

    pub fn update(&self, f: impl FnOnce(&mut StatsState)) {
        f(&mut write(&self.state));
    }

    pub fn snapshot(&self) -> StatsState {
        read(&self.state).clone()
    }
}

impl StatsProvider for InMemoryStats {
    fn health(&self) -> f32 {
        read(&self.state).health
    }

    fn max_health(&self) -> f32 {
        read(&self.state).max_health
    }

    fn hunger(&self) -> f32 {
        read(&self.state).hunger
    }

    fn max_hunger(&self) -> f32 {
        read(&self.state).max_hunger
    }

    fn thirst(&self) -> f32 {
        read(&self.state).thirst
    }

    fn max_thirst(&self) -> f32 {
        read(&self.state).max_thirst
    }

    fn mood(&self, dimension: MoodDimension) -> f32 {
        let state = read(&self.state);
        match dimension {
            MoodDimension::Social => state.social_mood,
            MoodDimension::Comfort => state.comfort_mood,
            MoodDimension::Safety => state.safety_mood,
        }
    }
}

// ============================================================================
// Perception
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerceptionState {
    pub enemies: Vec<Sighting>,
    pub items: Vec<Sighting>,
    pub npcs: Vec<Sighting>,
}

#[derive(Debug, Default)]
pub struct InMemoryPerception {
    state: RwLock<PerceptionState>,
}

impl InMemoryPerception {
    pub fn new(state: PerceptionState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut PerceptionState)) {
        f(&mut write(&self.state));
    }
}

impl PerceptionProvider for InMemoryPerception {
    fn enemies(&self) -> Vec<Sighting> {
        read(&self.state).enemies.clone()
    }

    fn items(&self) -> Vec<Sighting> {
        read(&self.state).items.clone()
    }

    fn npcs(&self) -> Vec<Sighting> {
        read(&self.state).npcs.clone()
    }

    fn enemy_count(&self) -> usize {
        read(&self.state).enemies.len()
    }

    fn item_count(&self) -> usize {
        read(&self.state).items.len()
    }

    fn npc_count(&self) -> usize {
        read(&self.state).npcs.len()
    }
}

// ============================================================================
// Inventory & currency
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InventoryState {
    pub slots: Vec<SlotView>,
    pub weapon_damage: f32,
}

impl InventoryState {
    pub fn with_slots(slot_count: usize) -> Self {
        Self {
            slots: vec![SlotView::default(); slot_count],
            weapon_damage: 0.0,
        }
    }

    /// Adds `quantity` to the first empty slot; false when full.
    pub fn add_to_free_slot(&mut self, quantity: u32) -> bool {
        match self.slots.iter_mut().find(|s| !s.is_occupied()) {
            Some(slot) => {
                slot.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Removes one unit from the last occupied slot; false when empty.
    pub fn take_one(&mut self) -> bool {
        match self.slots.iter_mut().rev().find(|s| s.is_occupied()) {
            Some(slot) => {
                slot.quantity -= 1;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInventory {
    state: RwLock<InventoryState>,
}

impl InMemoryInventory {
    pub fn new(state: InventoryState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut InventoryState) -> R) -> R {
        f(&mut write(&self.state))
    }
}

impl InventoryProvider for InMemoryInventory {
    fn slot_count(&self) -> usize {
        read(&self.state).slots.len()
    }

    fn slot(&self, index: usize) -> Option<SlotView> {
        read(&self.state).slots.get(index).copied()
    }

    fn weapon_damage(&self) -> f32 {
        read(&self.state).weapon_damage
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWallet {
    balance: RwLock<u32>,
}

impl InMemoryWallet {
    pub fn new(balance: u32) -> Self {
        Self {
            balance: RwLock::new(balance),
        }
    }

    pub fn set(&self, balance: u32) {
        *write(&self.balance) = balance;
    }

    pub fn deposit(&self, amount: u32) {
        let mut balance = write(&self.balance);
        *balance = balance.saturating_add(amount);
    }

    /// Withdraws `amount` if the balance covers it.
    pub fn spend(&self, amount: u32) -> bool {
        let mut balance = write(&self.balance);
        if *balance >= amount {
            *balance -= amount;
            true
        } else {
            false
        }
    }
}

impl CurrencyProvider for InMemoryWallet {
    fn balance(&self) -> u32 {
        *read(&self.balance)
    }
}

// ============================================================================
// Exploration memory
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryExploration {
    state: RwLock<(bool, f32)>,
}

impl InMemoryExploration {
    pub fn new(destination_known: bool, progress: f32) -> Self {
        Self {
            state: RwLock::new((destination_known, progress)),
        }
    }

    pub fn set_destination_known(&self, known: bool) {
        write(&self.state).0 = known;
    }

    pub fn set_progress(&self, progress: f32) {
        write(&self.state).1 = progress.clamp(0.0, 1.0);
    }
}

impl ExplorationMemory for InMemoryExploration {
    fn destination_known(&self) -> bool {
        read(&self.state).0
    }

    fn exploration_progress(&self) -> f32 {
        read(&self.state).1
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Movement controller that teleports by `step` along each direction and
/// remembers every command it received.
#[derive(Debug)]
pub struct RecordingMovement {
    position: RwLock<Vec2>,
    step: f32,
    commands: Mutex<Vec<Vec2>>,
}

impl RecordingMovement {
    /// A body that never moves, whatever it is told.
    pub fn anchored(position: Vec2) -> Self {
        Self::with_step(position, 0.0)
    }

    pub fn with_step(position: Vec2, step: f32) -> Self {
        Self {
            position: RwLock::new(position),
            step,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn set_position(&self, position: Vec2) {
        *write(&self.position) = position;
    }

    pub fn commands(&self) -> Vec<Vec2> {
        lock(&self.commands).clone()
    }

    pub fn command_count(&self) -> usize {
        lock(&self.commands).len()
    }

    pub fn clear(&self) {
        lock(&self.commands).clear();
    }
}

impl MovementController for RecordingMovement {
    fn position(&self) -> Vec2 {
        *read(&self.position)
    }

    fn apply_move(&self, direction: Vec2) {
        lock(&self.commands).push(direction);
        if self.step > 0.0 {
            let mut position = write(&self.position);
            *position = *position + direction.normalized() * self.step;
        }
    }
}

/// Reward sink that keeps every delta.
#[derive(Debug, Default)]
pub struct RecordingRewards {
    deltas: Mutex<Vec<f32>>,
}

impl RecordingRewards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deltas(&self) -> Vec<f32> {
        lock(&self.deltas).clone()
    }

    pub fn total(&self) -> f32 {
        lock(&self.deltas).iter().sum()
    }

    /// Returns and clears the accumulated deltas.
    pub fn drain(&self) -> Vec<f32> {
        std::mem::take(&mut *lock(&self.deltas))
    }
}

impl RewardSink for RecordingRewards {
    fn add_reward(&self, delta: f32) {
        lock(&self.deltas).push(delta);
    }
}
