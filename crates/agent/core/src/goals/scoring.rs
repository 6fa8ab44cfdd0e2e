//! Strategic priority scoring.
//!
//! Each strategic kind has a pure scoring function over the captured
//! [`GoalContext`] and the agent's personality. All scores land in `[0, 1]`.
//!
//! | Kind                 | Situation                                  | Personality            |
//! |----------------------|--------------------------------------------|------------------------|
//! | Survival             | worst survival ratio, or average when safe | caution                |
//! | ResourceAccumulation | gold tiers, inventory fullness, well-being | none                   |
//! | SocialBonding        | loneliness, shared destination, followers  | leadership+sociability |
//! | Progression          | destination known, exploration progress    | leadership / curiosity |

use super::{GoalContext, PersonalityProfile, StrategicKind};

const CRITICAL_RATIO: f32 = 0.3;

/// Survival priority.
///
/// Below the critical ratio the worst meter alone decides (`1 − min`);
/// otherwise the average deficit is scaled by caution.
pub fn survival(ctx: &GoalContext, personality: &PersonalityProfile) -> f32 {
    let min = ctx.survival.min();
    if min < CRITICAL_RATIO {
        return (1.0 - min).clamp(0.0, 1.0);
    }
    ((1.0 - ctx.survival.average()) * (0.5 + personality.caution() * 0.5)).clamp(0.0, 1.0)
}

/// Progression priority.
pub fn progression(ctx: &GoalContext, personality: &PersonalityProfile) -> f32 {
    let score = if ctx.destination_known {
        0.7 + personality.leadership() * 0.3
    } else {
        (0.3 + ctx.exploration_progress * 0.4) * personality.curiosity()
    };
    score.clamp(0.0, 1.0)
}

/// Resource accumulation priority.
///
/// The gold and fullness terms are skipped when no wallet or inventory is
/// wired.
pub fn resource_accumulation(ctx: &GoalContext) -> f32 {
    let mut score: f32 = 0.0;

    if let Some(gold) = ctx.gold {
        score += match gold {
            0..50 => 0.7,
            50..200 => 0.4,
            200..500 => 0.2,
            _ => 0.0,
        };
    }

    if let Some(fullness) = ctx.fullness {
        if fullness > 0.8 {
            score += 0.3;
        } else if fullness < 0.3 {
            score += 0.2;
        }
    }

    if ctx.survival.average() > 0.7 {
        score += 0.3;
    }

    score.clamp(0.0, 1.0)
}

/// Social bonding priority.
pub fn social_bonding(ctx: &GoalContext, personality: &PersonalityProfile) -> f32 {
    let loneliness = (-ctx.social_mood / 100.0).clamp(0.0, 1.0);
    let mut score = loneliness * 0.4;

    if ctx.destination_known {
        score += 0.3;
        if ctx.peers_pursuing(StrategicKind::Progression) >= 2 {
            score += 0.3;
        }
    }

    let affinity = (personality.leadership() + personality.sociability()) / 2.0;
    (score * affinity).clamp(0.0, 1.0)
}

/// The four strategic priorities of one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategicScores {
    pub survival: f32,
    pub resource_accumulation: f32,
    pub social_bonding: f32,
    pub progression: f32,
}

impl StrategicScores {
    pub fn compute(ctx: &GoalContext, personality: &PersonalityProfile) -> Self {
        Self {
            survival: survival(ctx, personality),
            resource_accumulation: resource_accumulation(ctx),
            social_bonding: social_bonding(ctx, personality),
            progression: progression(ctx, personality),
        }
    }

    pub fn get(&self, kind: StrategicKind) -> f32 {
        match kind {
            StrategicKind::Survival => self.survival,
            StrategicKind::ResourceAccumulation => self.resource_accumulation,
            StrategicKind::SocialBonding => self.social_bonding,
            StrategicKind::Progression => self.progression,
        }
    }

    /// Highest score wins; on a tie the kind declared first wins.
    pub fn select(&self) -> (StrategicKind, f32) {
        let mut best = StrategicKind::Survival;
        let mut best_score = self.get(best);

        for kind in StrategicKind::all() {
            let score = self.get(kind);
            // Strictly greater keeps the earlier kind on ties
            if score > best_score {
                best = kind;
                best_score = score;
            }
        }

        (best, best_score)
    }
}
