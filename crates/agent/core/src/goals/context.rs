//! Snapshot of agent state consulted by one goal evaluation.

use crate::env::{AgentEnv, Sighting, SurvivalRatios, nearest};
use crate::geometry::Vec2;
use crate::registry::{AgentId, PeerSnapshot};

use super::StrategicKind;

/// Everything the scoring and planning functions read, captured once so a
/// whole evaluation sees one consistent view.
///
/// Optional fields are `None` when the matching collaborator is not wired;
/// the scoring terms that depend on them are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalContext {
    pub position: Vec2,
    pub survival: SurvivalRatios,
    pub gold: Option<u32>,
    pub fullness: Option<f32>,
    pub weapon_damage: f32,
    pub social_mood: f32,
    pub destination_known: bool,
    pub exploration_progress: f32,
    pub enemies: Vec<Sighting>,
    pub npc_count: usize,
    pub peers: Vec<PeerSnapshot>,
}

impl Default for GoalContext {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            survival: SurvivalRatios::FULL,
            gold: None,
            fullness: None,
            weapon_damage: 0.0,
            social_mood: 0.0,
            destination_known: false,
            exploration_progress: 0.0,
            enemies: Vec::new(),
            npc_count: 0,
            peers: Vec::new(),
        }
    }
}

impl GoalContext {
    pub fn capture(env: &AgentEnv, me: AgentId) -> Self {
        let inventory = env.inventory();
        Self {
            position: env.position(),
            survival: env.survival_ratios(),
            gold: env.currency().map(|c| c.balance()),
            fullness: inventory.map(|i| i.fullness()),
            weapon_damage: inventory.map(|i| i.weapon_damage()).unwrap_or(0.0),
            social_mood: env.social_mood(),
            destination_known: env.destination_known(),
            exploration_progress: env.exploration_progress(),
            enemies: env.enemies(),
            npc_count: env.perception().map(|p| p.npc_count()).unwrap_or(0),
            peers: env.peers(me),
        }
    }

    /// Gold balance, zero without a wallet.
    pub fn gold(&self) -> u32 {
        self.gold.unwrap_or(0)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Distance to the closest perceived enemy.
    pub fn nearest_enemy_distance(&self) -> Option<f32> {
        nearest(&self.enemies, self.position).map(|(_, distance)| distance)
    }

    /// Whether any peer stands within `range`.
    pub fn peer_within(&self, range: f32) -> bool {
        self.peers
            .iter()
            .any(|p| p.position.distance(self.position) <= range)
    }

    pub fn peers_pursuing(&self, kind: StrategicKind) -> usize {
        self.peers
            .iter()
            .filter(|p| p.strategic == Some(kind))
            .count()
    }
}
