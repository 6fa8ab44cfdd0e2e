//! Survival stats and mood.

/// Mood axes a stats provider can be asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MoodDimension {
    Social,
    Comfort,
    Safety,
}

/// Live survival stats of the agent.
///
/// Hunger and thirst are satiation meters: full means well fed.
/// Mood values are in `[-100, 100]`.
pub trait StatsProvider: Send + Sync {
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;
    fn hunger(&self) -> f32;
    fn max_hunger(&self) -> f32;
    fn thirst(&self) -> f32;
    fn max_thirst(&self) -> f32;
    fn mood(&self, dimension: MoodDimension) -> f32;

    /// Health, hunger and thirst as fractions of their maxima.
    fn survival_ratios(&self) -> SurvivalRatios {
        SurvivalRatios {
            health: ratio(self.health(), self.max_health()),
            hunger: ratio(self.hunger(), self.max_hunger()),
            thirst: ratio(self.thirst(), self.max_thirst()),
        }
    }
}

/// Survival meters normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurvivalRatios {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
}

impl SurvivalRatios {
    /// Ratios used when no stats provider is wired: nothing is urgent.
    pub const FULL: SurvivalRatios = SurvivalRatios {
        health: 1.0,
        hunger: 1.0,
        thirst: 1.0,
    };

    pub fn min(&self) -> f32 {
        self.health.min(self.hunger).min(self.thirst)
    }

    pub fn average(&self) -> f32 {
        (self.health + self.hunger + self.thirst) / 3.0
    }
}

fn ratio(value: f32, max: f32) -> f32 {
    if max > 0.0 && value.is_finite() {
        (value / max).clamp(0.0, 1.0)
    } else {
        1.0
    }
}
