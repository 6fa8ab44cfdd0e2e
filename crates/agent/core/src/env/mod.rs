//! Collaborator traits the core reads from and writes to.
//!
//! Providers expose live agent state (stats, perception, inventory, currency,
//! exploration memory) and sinks accept the core's outputs (movement, reward).
//! The [`AgentEnv`] aggregate bundles them so the monitor and the arbiter can
//! run without hard coupling to a host. Every handle is optional: a missing
//! provider yields a neutral default rather than an error.
mod inventory;
pub mod memory;
mod perception;
mod stats;
mod world;

use std::sync::Arc;

pub use crate::registry::AgentDirectory;
pub use inventory::{CurrencyProvider, InventoryProvider, SlotView};
pub use perception::{PerceptionProvider, Sighting, nearest};
pub use stats::{MoodDimension, StatsProvider, SurvivalRatios};
pub use world::{ExplorationMemory, MovementController, RewardSink};

use crate::geometry::Vec2;
use crate::registry::{AgentId, PeerSnapshot};

/// Shared handles to one agent's collaborators.
///
/// Cloning is cheap; the monitor and the arbiter each hold a clone.
#[derive(Clone, Default)]
pub struct AgentEnv {
    stats: Option<Arc<dyn StatsProvider>>,
    perception: Option<Arc<dyn PerceptionProvider>>,
    inventory: Option<Arc<dyn InventoryProvider>>,
    currency: Option<Arc<dyn CurrencyProvider>>,
    exploration: Option<Arc<dyn ExplorationMemory>>,
    movement: Option<Arc<dyn MovementController>>,
    rewards: Option<Arc<dyn RewardSink>>,
    directory: Option<Arc<dyn AgentDirectory>>,
}

impl AgentEnv {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, stats: Arc<dyn StatsProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_perception(mut self, perception: Arc<dyn PerceptionProvider>) -> Self {
        self.perception = Some(perception);
        self
    }

    pub fn with_inventory(mut self, inventory: Arc<dyn InventoryProvider>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn with_currency(mut self, currency: Arc<dyn CurrencyProvider>) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_exploration(mut self, exploration: Arc<dyn ExplorationMemory>) -> Self {
        self.exploration = Some(exploration);
        self
    }

    pub fn with_movement(mut self, movement: Arc<dyn MovementController>) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn with_rewards(mut self, rewards: Arc<dyn RewardSink>) -> Self {
        self.rewards = Some(rewards);
        self
    }

    pub fn with_directory(mut self, directory: Arc<dyn AgentDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn stats(&self) -> Option<&dyn StatsProvider> {
        self.stats.as_deref()
    }

    pub fn perception(&self) -> Option<&dyn PerceptionProvider> {
        self.perception.as_deref()
    }

    pub fn inventory(&self) -> Option<&dyn InventoryProvider> {
        self.inventory.as_deref()
    }

    pub fn currency(&self) -> Option<&dyn CurrencyProvider> {
        self.currency.as_deref()
    }

    pub fn exploration(&self) -> Option<&dyn ExplorationMemory> {
        self.exploration.as_deref()
    }

    pub fn movement(&self) -> Option<&dyn MovementController> {
        self.movement.as_deref()
    }

    // ========================================================================
    // Neutral-default helpers
    // ========================================================================

    /// Current position, or the origin when no body is wired.
    pub fn position(&self) -> Vec2 {
        self.movement().map(|m| m.position()).unwrap_or(Vec2::ZERO)
    }

    pub fn survival_ratios(&self) -> SurvivalRatios {
        self.stats()
            .map(|s| s.survival_ratios())
            .unwrap_or(SurvivalRatios::FULL)
    }

    pub fn health(&self) -> f32 {
        self.stats().map(|s| s.health()).unwrap_or(0.0)
    }

    pub fn social_mood(&self) -> f32 {
        self.stats()
            .map(|s| s.mood(MoodDimension::Social))
            .unwrap_or(0.0)
    }

    pub fn enemies(&self) -> Vec<Sighting> {
        self.perception().map(|p| p.enemies()).unwrap_or_default()
    }

    pub fn enemy_count(&self) -> usize {
        self.perception().map(|p| p.enemy_count()).unwrap_or(0)
    }

    pub fn item_count(&self) -> usize {
        self.perception().map(|p| p.item_count()).unwrap_or(0)
    }

    pub fn npcs(&self) -> Vec<Sighting> {
        self.perception().map(|p| p.npcs()).unwrap_or_default()
    }

    pub fn gold(&self) -> u32 {
        self.currency().map(|c| c.balance()).unwrap_or(0)
    }

    pub fn destination_known(&self) -> bool {
        self.exploration()
            .map(|e| e.destination_known())
            .unwrap_or(false)
    }

    pub fn exploration_progress(&self) -> f32 {
        self.exploration()
            .map(|e| e.exploration_progress().clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Other registered agents, empty when no directory is wired.
    pub fn peers(&self, me: AgentId) -> Vec<PeerSnapshot> {
        self.directory
            .as_deref()
            .map(|d| d.peers(me))
            .unwrap_or_default()
    }

    /// Pushes a reward delta; dropped silently without a sink.
    pub fn reward(&self, delta: f32) {
        if let Some(rewards) = self.rewards.as_deref() {
            rewards.add_reward(delta);
        }
    }

    /// Issues a move; returns false when no movement controller is wired.
    pub fn apply_move(&self, direction: Vec2) -> bool {
        match self.movement() {
            Some(movement) => {
                movement.apply_move(direction);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for AgentEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentEnv")
            .field("stats", &self.stats.is_some())
            .field("perception", &self.perception.is_some())
            .field("inventory", &self.inventory.is_some())
            .field("currency", &self.currency.is_some())
            .field("exploration", &self.exploration.is_some())
            .field("movement", &self.movement.is_some())
            .field("rewards", &self.rewards.is_some())
            .field("directory", &self.directory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_env_is_neutral() {
        let env = AgentEnv::empty();
        assert_eq!(env.position(), Vec2::ZERO);
        assert_eq!(env.survival_ratios(), SurvivalRatios::FULL);
        assert_eq!(env.enemy_count(), 0);
        assert_eq!(env.gold(), 0);
        assert!(!env.destination_known());
        assert!(env.peers(AgentId(1)).is_empty());
        assert!(!env.apply_move(Vec2::new(1.0, 0.0)));
        env.reward(-2.0);
    }
}
