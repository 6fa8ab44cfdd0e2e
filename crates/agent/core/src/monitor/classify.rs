//! Decides whether a repeating pattern is wasteful or legitimate repetition.

use super::pattern::PatternKey;
use crate::action::ActionChannels;
use crate::geometry::{Vec2, max_displacement, path_length};

/// Why a pattern was judged the way it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Classification {
    /// No step moves or fights: an idle or interact-only loop.
    IdleLoop,
    /// Moving without getting anywhere, repeatedly.
    PushingIntoWall,
    /// Covering ground but ending where it started, many times over.
    Oscillating,
    /// Repeated combat while enemies are near.
    EngagedInCombat,
    /// Covered ground and got somewhere.
    MakingProgress,
    /// Too little movement to count as progress.
    Stalled,
}

impl Classification {
    pub const fn is_counterproductive(self) -> bool {
        matches!(
            self,
            Self::IdleLoop | Self::PushingIntoWall | Self::Oscillating | Self::Stalled
        )
    }
}

const WALL_PATH_LIMIT: f32 = 0.5;
const WALL_DISPLACEMENT_LIMIT: f32 = 0.8;
const WALL_MIN_FREQUENCY: u32 = 2;
const OSCILLATION_MIN_PATH: f32 = 1.0;
const OSCILLATION_MAX_DISPLACEMENT: f32 = 1.0;
const OSCILLATION_MIN_FREQUENCY: u32 = 5;
const PROGRESS_MIN_PATH: f32 = 0.5;
const PROGRESS_MIN_DISPLACEMENT: f32 = 1.0;

/// Classifies `pattern` against the recent position window.
///
/// The movement rules of [`classify_movement`] decide first; the combat
/// override then relabels any pattern with a combat step as
/// [`Classification::EngagedInCombat`] while enemies are near.
pub fn classify(
    pattern: &PatternKey,
    positions: &[Vec2],
    frequency: u32,
    enemies_nearby: bool,
) -> Classification {
    let movement = classify_movement(pattern, positions, frequency);
    with_combat_override(movement, pattern, enemies_nearby)
}

/// Movement rules only, first match wins:
/// 1. no move or combat step → [`Classification::IdleLoop`]
/// 2. moves, path < 0.5, displacement < 0.8, frequency ≥ 2 → wall
/// 3. path > 1.0, displacement < 1.0, frequency > 5 → oscillating
/// 4. path > 0.5 and displacement > 1.0 → progress, else stalled
pub fn classify_movement(
    pattern: &PatternKey,
    positions: &[Vec2],
    frequency: u32,
) -> Classification {
    let channels = pattern.channels();
    if !channels.moves_or_fights() {
        return Classification::IdleLoop;
    }

    let path = path_length(positions);
    let displacement = max_displacement(positions);

    if channels.contains(ActionChannels::MOVE)
        && path < WALL_PATH_LIMIT
        && displacement < WALL_DISPLACEMENT_LIMIT
        && frequency >= WALL_MIN_FREQUENCY
    {
        return Classification::PushingIntoWall;
    }

    if path > OSCILLATION_MIN_PATH
        && displacement < OSCILLATION_MAX_DISPLACEMENT
        && frequency > OSCILLATION_MIN_FREQUENCY
    {
        return Classification::Oscillating;
    }

    if path > PROGRESS_MIN_PATH && displacement > PROGRESS_MIN_DISPLACEMENT {
        Classification::MakingProgress
    } else {
        Classification::Stalled
    }
}

/// Repeated fighting near enemies is expected, never a loop.
pub fn with_combat_override(
    movement: Classification,
    pattern: &PatternKey,
    enemies_nearby: bool,
) -> Classification {
    if enemies_nearby && pattern.channels().contains(ActionChannels::COMBAT) {
        Classification::EngagedInCombat
    } else {
        movement
    }
}
