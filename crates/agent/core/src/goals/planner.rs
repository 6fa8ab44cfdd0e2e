//! Tactical and actionable derivation.
//!
//! Both tiers follow fixed decision trees: the tactical goal is chosen from
//! the strategic kind and live state, the actionable goal from the tactical
//! type. Checks are written in priority order and the first match wins.

use super::{ActionableKind, GoalContext, StrategicKind, TacticalKind, TacticalType};
use crate::config::GoalConfig;

const CRITICAL_RATIO: f32 = 0.3;
const PREVENTIVE_RATIO: f32 = 0.6;
const FULL_INVENTORY: f32 = 0.8;
const HUNTING_HEALTH: f32 = 0.6;
const EMERGENCY_GOLD: u32 = 20;
const LONELY_MOOD: f32 = -70.0;
const GROUP_FIGHT_ENEMIES: usize = 2;
const GROUP_FIGHT_HEALTH: f32 = 0.6;
const RECOVERY_HEALTH: f32 = 0.5;

pub fn select_tactical(
    strategic: StrategicKind,
    ctx: &GoalContext,
    config: &GoalConfig,
) -> TacticalKind {
    match strategic {
        StrategicKind::Survival => survival(ctx, config),
        StrategicKind::ResourceAccumulation => resource_accumulation(ctx, config),
        StrategicKind::SocialBonding => social_bonding(ctx, config),
        StrategicKind::Progression => progression(ctx),
    }
}

/// Life-threatening health first, then thirst, then hunger, then upkeep.
fn survival(ctx: &GoalContext, config: &GoalConfig) -> TacticalKind {
    let ratios = ctx.survival;
    let gold = ctx.gold();

    if ratios.health < CRITICAL_RATIO {
        return if gold >= config.heal_cost {
            TacticalKind::PaidHealing
        } else {
            TacticalKind::ItemHealing
        };
    }
    if ratios.thirst < CRITICAL_RATIO {
        return TacticalKind::FreeWater;
    }
    if ratios.hunger < CRITICAL_RATIO {
        return if gold >= config.food_cost {
            TacticalKind::PaidFood
        } else {
            TacticalKind::FightForMoney
        };
    }
    if ratios.min() < PREVENTIVE_RATIO && gold >= config.resupply_cost {
        return TacticalKind::PreventiveResupply;
    }
    if gold >= config.food_cost {
        TacticalKind::PreventiveResupply
    } else {
        TacticalKind::FightForMoney
    }
}

fn progression(ctx: &GoalContext) -> TacticalKind {
    if ctx.destination_known {
        TacticalKind::HeadToDestination
    } else {
        TacticalKind::ExploreNewArea
    }
}

fn resource_accumulation(ctx: &GoalContext, config: &GoalConfig) -> TacticalKind {
    let peer_nearby = ctx.peer_within(config.contact_range);
    let gold = ctx.gold();

    if ctx.fullness.is_some_and(|f| f > FULL_INVENTORY) {
        return if peer_nearby {
            TacticalKind::PeerTradeForSpace
        } else if gold >= config.capacity_upgrade_cost {
            TacticalKind::UpgradeCapacity
        } else {
            TacticalKind::LiquidateItems
        };
    }

    if ctx.survival.min() < CRITICAL_RATIO && peer_nearby {
        return TacticalKind::UrgentSupplyTrade;
    }

    if gold < config.investment_threshold {
        return if ctx.survival.health >= HUNTING_HEALTH && ctx.enemy_count() > 0 {
            TacticalKind::HuntForMoney
        } else {
            TacticalKind::ExploreForMoney
        };
    }

    if ctx.weapon_damage < config.weapon_damage_target {
        return if peer_nearby {
            TacticalKind::PeerWeaponTrade
        } else {
            TacticalKind::VendorEquipment
        };
    }

    TacticalKind::PassiveCollection
}

fn social_bonding(ctx: &GoalContext, config: &GoalConfig) -> TacticalKind {
    let desperate = ctx.survival.health < CRITICAL_RATIO || ctx.gold() < EMERGENCY_GOLD;
    if desperate && ctx.social_mood < 0.0 {
        return TacticalKind::EmergencyHelpRequest;
    }
    if ctx.npc_count > 0 && !ctx.peers.is_empty() {
        return TacticalKind::ShareNpcLocation;
    }
    if ctx.social_mood < LONELY_MOOD && ctx.peer_within(config.contact_range) {
        return TacticalKind::FaceToFaceContact;
    }
    if ctx.enemy_count() >= GROUP_FIGHT_ENEMIES && ctx.survival.health > GROUP_FIGHT_HEALTH {
        return TacticalKind::CombatInvite;
    }
    if ctx.destination_known {
        return TacticalKind::DestinationCoordination;
    }
    TacticalKind::RelationshipMaintenance
}

/// Maps a tactical type to the next concrete action.
pub fn select_actionable(
    tactical: TacticalType,
    ctx: &GoalContext,
    config: &GoalConfig,
) -> ActionableKind {
    match tactical {
        TacticalType::Combat => match ctx.nearest_enemy_distance() {
            Some(distance) if distance <= config.attack_range => {
                ActionableKind::AttackNearestEnemy
            }
            Some(_) => ActionableKind::ApproachEnemy,
            None => ActionableKind::RandomMove,
        },
        TacticalType::Exploration => ActionableKind::MoveToUnexplored,
        TacticalType::Trade => {
            if ctx.npc_count > 0 {
                ActionableKind::InteractWithNpc
            } else {
                ActionableKind::SearchForNpc
            }
        }
        TacticalType::ResourceManagement => {
            let ratios = ctx.survival;
            let needs_recovery = ratios.health < RECOVERY_HEALTH
                || ratios.hunger < CRITICAL_RATIO
                || ratios.thirst < CRITICAL_RATIO;
            if needs_recovery {
                ActionableKind::UseRecoveryItem
            } else {
                ActionableKind::PickUpItem
            }
        }
        TacticalType::Communication => ActionableKind::Interact,
    }
}
