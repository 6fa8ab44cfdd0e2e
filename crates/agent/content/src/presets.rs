//! Named personality presets.
//!
//! A preset is a [`TraitRanges`] keyed by archetype name ("scout",
//! "merchant", ...). Agents spawned from a preset roll their personality
//! inside those ranges; unknown names fall back to the registry's default
//! ranges.

use std::collections::HashMap;

use agent_core::{PersonalityProfile, TraitRange, TraitRanges};
use rand::Rng;
use tracing::debug;

/// One of the five personality traits, as named in preset files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraitKind {
    Aggression,
    Curiosity,
    Sociability,
    Caution,
    Leadership,
}

impl TraitKind {
    pub const fn all() -> [Self; 5] {
        [
            Self::Aggression,
            Self::Curiosity,
            Self::Sociability,
            Self::Caution,
            Self::Leadership,
        ]
    }

    fn slot(self, ranges: &mut TraitRanges) -> &mut TraitRange {
        match self {
            Self::Aggression => &mut ranges.aggression,
            Self::Curiosity => &mut ranges.curiosity,
            Self::Sociability => &mut ranges.sociability,
            Self::Caution => &mut ranges.caution,
            Self::Leadership => &mut ranges.leadership,
        }
    }
}

/// Builds ranges from sparse `(trait, min, max)` triples.
///
/// Traits not mentioned keep the default roll range. Later entries for the
/// same trait overwrite earlier ones. The result is not validated.
pub fn build_ranges_from_pairs(entries: &[(TraitKind, f32, f32)]) -> TraitRanges {
    let mut ranges = TraitRanges::default();
    for (kind, min, max) in entries {
        *kind.slot(&mut ranges) = TraitRange::new(*min, *max);
    }
    ranges
}

/// Archetype name → personality roll ranges.
#[derive(Clone, Debug)]
pub struct PresetRegistry {
    presets: HashMap<String, TraitRanges>,
    fallback: TraitRanges,
}

impl PresetRegistry {
    /// Creates an empty registry falling back to the default ranges.
    pub fn new() -> Self {
        Self::with_fallback(TraitRanges::default())
    }

    pub fn with_fallback(fallback: TraitRanges) -> Self {
        Self {
            presets: HashMap::new(),
            fallback,
        }
    }

    pub fn add_preset(&mut self, name: impl Into<String>, ranges: TraitRanges) {
        self.presets.insert(name.into(), ranges);
    }

    pub fn get(&self, name: &str) -> Option<&TraitRanges> {
        self.presets.get(name)
    }

    /// Ranges for `name`, or the fallback when no such preset exists.
    pub fn ranges_for(&self, name: &str) -> &TraitRanges {
        self.presets.get(name).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &TraitRanges {
        &self.fallback
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Rolls a personality from the named preset.
    pub fn roll<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> PersonalityProfile {
        if !self.presets.contains_key(name) {
            debug!(
                target: "cognition::content",
                preset = name,
                "unknown personality preset, rolling from fallback ranges"
            );
        }
        PersonalityProfile::roll(self.ranges_for(name), rng)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn sparse_entries_override_only_named_traits() {
        let ranges = build_ranges_from_pairs(&[
            (TraitKind::Curiosity, 0.8, 1.0),
            (TraitKind::Caution, 0.0, 0.2),
        ]);
        let defaults = TraitRanges::default();

        assert_eq!(ranges.curiosity, TraitRange::new(0.8, 1.0));
        assert_eq!(ranges.caution, TraitRange::new(0.0, 0.2));
        assert_eq!(ranges.aggression, defaults.aggression);
        assert_eq!(ranges.leadership, defaults.leadership);
    }

    #[test]
    fn rolls_stay_inside_the_preset() {
        let mut registry = PresetRegistry::new();
        registry.add_preset(
            "scout",
            build_ranges_from_pairs(&[(TraitKind::Curiosity, 0.9, 1.0)]),
        );
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..50 {
            let profile = registry.roll("scout", &mut rng);
            assert!((0.9..=1.0).contains(&profile.curiosity()));
        }
    }

    #[test]
    fn unknown_names_use_the_fallback() {
        let fallback = build_ranges_from_pairs(&[(TraitKind::Leadership, 0.0, 0.0)]);
        let registry = PresetRegistry::with_fallback(fallback);
        let mut rng = StdRng::seed_from_u64(4);

        assert!(registry.get("ghost").is_none());
        assert_eq!(registry.ranges_for("ghost"), &fallback);
        assert_eq!(registry.roll("ghost", &mut rng).leadership(), 0.0);
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = PresetRegistry::default();
        for name in ["warrior", "merchant", "scout"] {
            registry.add_preset(name, TraitRanges::default());
        }
        assert_eq!(registry.names(), vec!["merchant", "scout", "warrior"]);
        assert_eq!(registry.len(), 3);
    }
}
