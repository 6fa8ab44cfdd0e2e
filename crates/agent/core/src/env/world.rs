//! What the agent remembers about the map, and its effect on the world.

use crate::geometry::Vec2;

pub trait ExplorationMemory: Send + Sync {
    /// Whether the key destination (e.g. the portal) has been located.
    fn destination_known(&self) -> bool;
    /// Fraction of the map explored, in `[0, 1]`.
    fn exploration_progress(&self) -> f32;
}

/// Body of the agent: where it is and how to push it.
pub trait MovementController: Send + Sync {
    fn position(&self) -> Vec2;
    /// Executes one move along a unit direction vector.
    fn apply_move(&self, direction: Vec2);
}

/// Receives scalar reward deltas for the learning policy.
pub trait RewardSink: Send + Sync {
    fn add_reward(&self, delta: f32);
}
