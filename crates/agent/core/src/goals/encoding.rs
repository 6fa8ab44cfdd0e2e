//! Fixed-length observation vector for an external policy.
//!
//! Layout (stable, part of the public contract):
//!
//! | Slots  | Content                                                     |
//! |--------|-------------------------------------------------------------|
//! | 0..4   | strategic one-hot, in [`StrategicKind::all`] order          |
//! | 4..9   | tactical-type one-hot, in [`TacticalType::all`] order       |
//! | 9..12  | progress: strategic, tactical, actionable                   |
//! | 12..17 | traits: aggression, curiosity, sociability, caution, leader |

use super::{GoalChain, PersonalityProfile, ProgressCounters, StrategicKind, TacticalType};

pub const GOAL_ENCODING_LEN: usize =
    StrategicKind::COUNT + TacticalType::COUNT + 3 + PersonalityProfile::TRAIT_COUNT;

pub type GoalEncoding = [f32; GOAL_ENCODING_LEN];

const TACTICAL_OFFSET: usize = StrategicKind::COUNT;
const PROGRESS_OFFSET: usize = TACTICAL_OFFSET + TacticalType::COUNT;
const TRAIT_OFFSET: usize = PROGRESS_OFFSET + 3;

pub fn encode(
    chain: &GoalChain,
    progress: &ProgressCounters,
    personality: &PersonalityProfile,
) -> GoalEncoding {
    let mut out = [0.0; GOAL_ENCODING_LEN];
    out[chain.strategic.kind.index()] = 1.0;
    out[TACTICAL_OFFSET + chain.tactical.kind.tactical_type().index()] = 1.0;
    out[PROGRESS_OFFSET..TRAIT_OFFSET].copy_from_slice(&progress.to_array());
    out[TRAIT_OFFSET..].copy_from_slice(&personality.to_array());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::{ActionableKind, Goal, TacticalKind};

    #[test]
    fn layout_matches_contract() {
        assert_eq!(GOAL_ENCODING_LEN, 17);

        let chain = GoalChain {
            strategic: Goal::new(StrategicKind::SocialBonding, 0.6),
            tactical: Goal::new(TacticalKind::CombatInvite, 0.6),
            actionable: Goal::new(ActionableKind::Interact, 0.6),
        };
        let progress = ProgressCounters {
            strategic: 0.1,
            tactical: 0.2,
            actionable: 0.3,
        };
        let personality = PersonalityProfile::new(0.1, 0.2, 0.3, 0.4, 0.5);
        let encoding = encode(&chain, &progress, &personality);

        assert_eq!(&encoding[..4], &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(&encoding[4..9], &[0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&encoding[9..12], &[0.1, 0.2, 0.3]);
        assert_eq!(&encoding[12..], &[0.1, 0.2, 0.3, 0.4, 0.5]);
    }
}
