//! Personality traits rolled once per agent.

use rand::Rng;

use crate::config::{TraitRange, TraitRanges};

/// Five traits in `[0, 1]`, fixed for the agent's lifetime.
///
/// Fields are private; a profile can only be built clamped or rolled.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonalityProfile {
    aggression: f32,
    curiosity: f32,
    sociability: f32,
    caution: f32,
    leadership: f32,
}

impl PersonalityProfile {
    pub const TRAIT_COUNT: usize = 5;

    /// Builds a profile, clamping every trait into `[0, 1]`. NaN becomes 0.5.
    pub fn new(
        aggression: f32,
        curiosity: f32,
        sociability: f32,
        caution: f32,
        leadership: f32,
    ) -> Self {
        Self {
            aggression: unit(aggression),
            curiosity: unit(curiosity),
            sociability: unit(sociability),
            caution: unit(caution),
            leadership: unit(leadership),
        }
    }

    /// Rolls each trait uniformly within its range.
    pub fn roll<R: Rng + ?Sized>(ranges: &TraitRanges, rng: &mut R) -> Self {
        Self::new(
            sample(ranges.aggression, rng),
            sample(ranges.curiosity, rng),
            sample(ranges.sociability, rng),
            sample(ranges.caution, rng),
            sample(ranges.leadership, rng),
        )
    }

    pub fn aggression(&self) -> f32 {
        self.aggression
    }

    pub fn curiosity(&self) -> f32 {
        self.curiosity
    }

    pub fn sociability(&self) -> f32 {
        self.sociability
    }

    pub fn caution(&self) -> f32 {
        self.caution
    }

    pub fn leadership(&self) -> f32 {
        self.leadership
    }

    /// Traits in encoding order.
    pub fn to_array(&self) -> [f32; Self::TRAIT_COUNT] {
        [
            self.aggression,
            self.curiosity,
            self.sociability,
            self.caution,
            self.leadership,
        ]
    }
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5, 0.5)
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn sample<R: Rng + ?Sized>(range: TraitRange, rng: &mut R) -> f32 {
    if range.max <= range.min {
        return range.min;
    }
    rng.gen_range(range.min..=range.max)
}
