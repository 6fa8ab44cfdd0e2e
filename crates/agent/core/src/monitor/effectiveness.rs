//! Rolling effectiveness score from per-tick state deltas.

use crate::env::AgentEnv;
use crate::geometry::Vec2;

const HEALTH_WEIGHT: f32 = 2.0;
const INVENTORY_WEIGHT: f32 = 1.0;
const INVENTORY_SCALE: f32 = 0.1;
const COMBAT_WEIGHT: f32 = 1.0;
const COMBAT_SCALE: f32 = 0.2;
const PROGRESS_WEIGHT: f32 = 0.5;
const PROGRESS_SCALE: f32 = 0.1;

/// Score used before any term has contributed.
pub const NEUTRAL_EFFECTIVENESS: f32 = 0.5;

/// What the tracker saw on the previous tick. `None` marks a collaborator
/// that was not wired, so its term is skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Observation {
    health: Option<f32>,
    items: Option<u32>,
    enemies: Option<usize>,
    position: Option<Vec2>,
}

impl Observation {
    fn capture(env: &AgentEnv) -> Self {
        Self {
            health: env.stats().map(|s| s.health()),
            items: env.inventory().map(|i| i.total_items()),
            enemies: env.perception().map(|p| p.enemy_count()),
            position: env.movement().map(|m| m.position()),
        }
    }
}

/// Weighted sum of deltas since the previous observation.
///
/// Health change counts double, item gain and enemy reduction count once
/// after scaling, and distance from a periodically re-placed progress
/// anchor counts half. The score is `clamp01((Σ wᵢ·dᵢ + 1) / Σ wᵢ)` over
/// the terms whose collaborators are present.
#[derive(Clone, Debug)]
pub struct EffectivenessTracker {
    previous: Option<Observation>,
    anchor: Option<Vec2>,
    anchor_age: f32,
    anchor_window: f32,
    current: f32,
}

impl EffectivenessTracker {
    pub fn new(anchor_window: f32) -> Self {
        Self {
            previous: None,
            anchor: None,
            anchor_age: 0.0,
            anchor_window,
            current: NEUTRAL_EFFECTIVENESS,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Samples the environment and recomputes the score.
    pub fn update(&mut self, env: &AgentEnv, dt: f32) -> f32 {
        let now = Observation::capture(env);

        self.anchor_age += dt;
        if self.anchor.is_none() || self.anchor_age >= self.anchor_window {
            self.anchor = now.position;
            self.anchor_age = 0.0;
        }

        let Some(previous) = self.previous.replace(now) else {
            return self.current;
        };

        let mut weighted = 0.0;
        let mut weights = 0.0;

        if let (Some(before), Some(after)) = (previous.health, now.health) {
            weighted += (after - before) * HEALTH_WEIGHT;
            weights += HEALTH_WEIGHT;
        }
        if let (Some(before), Some(after)) = (previous.items, now.items) {
            let gained = after as f32 - before as f32;
            weighted += gained * INVENTORY_SCALE * INVENTORY_WEIGHT;
            weights += INVENTORY_WEIGHT;
        }
        if let (Some(before), Some(after)) = (previous.enemies, now.enemies) {
            let defeated = before as f32 - after as f32;
            weighted += defeated * COMBAT_SCALE * COMBAT_WEIGHT;
            weights += COMBAT_WEIGHT;
        }
        if let (Some(anchor), Some(position)) = (self.anchor, now.position) {
            weighted += position.distance(anchor) * PROGRESS_SCALE * PROGRESS_WEIGHT;
            weights += PROGRESS_WEIGHT;
        }

        self.current = if weights > 0.0 {
            ((weighted + 1.0) / weights).clamp(0.0, 1.0)
        } else {
            NEUTRAL_EFFECTIVENESS
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::memory::{InMemoryStats, RecordingMovement};

    #[test]
    fn neutral_without_collaborators() {
        let mut tracker = EffectivenessTracker::new(5.0);
        let env = AgentEnv::empty();
        tracker.update(&env, 0.1);
        assert_eq!(tracker.update(&env, 0.1), NEUTRAL_EFFECTIVENESS);
    }

    #[test]
    fn health_loss_drives_score_to_zero() {
        let stats = Arc::new(InMemoryStats::with_levels(100.0, 100.0, 100.0));
        let env = AgentEnv::empty().with_stats(stats.clone());
        let mut tracker = EffectivenessTracker::new(5.0);
        tracker.update(&env, 0.1);

        stats.update(|s| s.health = 90.0);
        assert_eq!(tracker.update(&env, 0.1), 0.0);
    }

    #[test]
    fn unchanged_health_scores_one_over_weight() {
        let stats = Arc::new(InMemoryStats::default());
        let env = AgentEnv::empty().with_stats(stats);
        let mut tracker = EffectivenessTracker::new(5.0);
        tracker.update(&env, 0.1);
        assert!((tracker.update(&env, 0.1) - 0.5).abs() < 1e-6);
    }

    fn stats_and_body() -> (AgentEnv, Arc<RecordingMovement>) {
        let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
        let env = AgentEnv::empty()
            .with_stats(Arc::new(InMemoryStats::default()))
            .with_movement(body.clone());
        (env, body)
    }

    #[test]
    fn travel_from_anchor_raises_score() {
        let (env, body) = stats_and_body();
        let mut tracker = EffectivenessTracker::new(5.0);
        tracker.update(&env, 0.1);

        let idle = tracker.update(&env, 0.1);
        assert!((idle - 0.4).abs() < 1e-6);
        body.set_position(Vec2::new(10.0, 0.0));
        let travelled = tracker.update(&env, 0.1);
        assert!((travelled - 0.6).abs() < 1e-6);
    }

    #[test]
    fn anchor_is_replaced_after_window() {
        let (env, body) = stats_and_body();
        let mut tracker = EffectivenessTracker::new(1.0);
        tracker.update(&env, 0.1);

        body.set_position(Vec2::new(10.0, 0.0));
        assert!((tracker.update(&env, 0.1) - 0.6).abs() < 1e-6);
        // Past the window the anchor moves to the current position.
        assert!((tracker.update(&env, 1.0) - 0.4).abs() < 1e-6);
    }
}
