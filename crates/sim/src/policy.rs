//! Scripted stand-in for a learned policy.
//!
//! Turns the arbiter's actionable goal into an action vector and lets the
//! monitor's suggestions perturb it. Movement is encoded on the move branch
//! as `1 + index` into [`COMPASS_DIRECTIONS`].

use agent_core::geometry::{COMPASS_DIRECTIONS, random_compass_direction};
use agent_core::{
    ActionSuggestion, ActionVector, ActionableKind, Sighting, StrategicKind, Vec2,
};
use rand::Rng;

use crate::world::{VisitedCells, World};

/// Distance at which NPCs can be talked to.
pub const INTERACT_RANGE: f32 = 1.5;
/// Distance at which loot can be picked up.
pub const PICKUP_RANGE: f32 = 1.0;

pub const ITEM_PICK_UP: i32 = 1;
pub const ITEM_USE: i32 = 2;

/// What the policy sees of one agent on one step.
pub struct Observation<'a> {
    pub position: Vec2,
    pub strategic: StrategicKind,
    pub actionable: ActionableKind,
    pub suggestion: ActionSuggestion,
    pub destination_known: bool,
    pub attack_range: f32,
    pub world: &'a World,
    pub visited: &'a VisitedCells,
}

/// Move branch value for the compass direction closest to `direction`.
pub fn encode_direction(direction: Vec2) -> i32 {
    let unit = direction.normalized();
    if unit == Vec2::ZERO {
        return 0;
    }
    let mut best = 0;
    let mut best_dot = f32::MIN;
    for (i, d) in COMPASS_DIRECTIONS.iter().enumerate() {
        let dot = d.x * unit.x + d.y * unit.y;
        if dot > best_dot {
            best = i;
            best_dot = dot;
        }
    }
    best as i32 + 1
}

/// Unit direction of a move branch value, `None` for "no move".
pub fn decode_direction(movement: i32) -> Option<Vec2> {
    let index = usize::try_from(movement).ok()?.checked_sub(1)?;
    COMPASS_DIRECTIONS.get(index).copied()
}

pub fn decide<R: Rng + ?Sized>(obs: &Observation<'_>, rng: &mut R) -> ActionVector {
    let mut action = ActionVector::IDLE;
    let here = obs.position;
    let toward = |target: Vec2| encode_direction(target - here);
    let wander = |rng: &mut R| encode_direction(random_compass_direction(rng));

    match obs.actionable {
        ActionableKind::AttackNearestEnemy => {
            action.0[ActionVector::COMBAT] = 1;
            if obs.world.enemy_within(here, obs.attack_range).is_none() {
                if let Some(enemy) = nearest(&obs.world.enemies_near(here), here) {
                    action.0[ActionVector::MOVE] = toward(enemy);
                }
            }
        }
        ActionableKind::ApproachEnemy => {
            action.0[ActionVector::MOVE] = match nearest(&obs.world.enemies_near(here), here) {
                Some(enemy) => toward(enemy),
                None => wander(rng),
            };
        }
        ActionableKind::MoveToUnexplored => {
            let target = if obs.destination_known {
                Some(obs.world.portal)
            } else {
                obs.visited.nearest_unvisited(&obs.world.layout, here)
            };
            action.0[ActionVector::MOVE] = match target {
                Some(target) => toward(target),
                None => wander(rng),
            };
        }
        ActionableKind::InteractWithNpc | ActionableKind::SearchForNpc => {
            if obs.world.npc_within(here, INTERACT_RANGE).is_some() {
                action.0[ActionVector::INTERACT] = 1;
            } else {
                action.0[ActionVector::MOVE] = match nearest(&obs.world.npcs_near(here), here) {
                    Some(npc) => toward(npc),
                    None => wander(rng),
                };
            }
        }
        ActionableKind::UseRecoveryItem => {
            action.0[ActionVector::ITEM] = ITEM_USE;
        }
        ActionableKind::PickUpItem => {
            let loot = obs.world.loot_near(here);
            match nearest(&loot, here) {
                Some(p) if p.distance(here) <= PICKUP_RANGE => {
                    action.0[ActionVector::ITEM] = ITEM_PICK_UP;
                }
                Some(p) => action.0[ActionVector::MOVE] = toward(p),
                None => action.0[ActionVector::MOVE] = wander(rng),
            }
        }
        ActionableKind::Interact => {
            action.0[ActionVector::INTERACT] = 1;
        }
        ActionableKind::RandomMove => {
            action.0[ActionVector::MOVE] = wander(rng);
        }
    }

    if obs.strategic == StrategicKind::SocialBonding {
        action.0[ActionVector::COMMUNICATE] = 1;
    }

    if obs.suggestion.should_random_move {
        action.0[ActionVector::MOVE] = wander(rng);
    } else if obs.suggestion.should_add_noise
        && rng.gen_range(0.0..1.0) < obs.suggestion.noise_level
    {
        action.0[ActionVector::MOVE] = wander(rng);
    }

    action
}

fn nearest(sightings: &[Sighting], from: Vec2) -> Option<Vec2> {
    agent_core::env::nearest(sightings, from).map(|(s, _)| s.position)
}
