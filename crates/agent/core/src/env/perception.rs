//! Nearby entities as reported by the host's sensing layer.

use crate::geometry::Vec2;

/// One perceived entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sighting {
    pub position: Vec2,
    /// Free-form type tag (e.g. `"healer"`, `"merchant"`, `"wolf"`).
    pub tag: String,
}

impl Sighting {
    pub fn new(position: Vec2, tag: impl Into<String>) -> Self {
        Self {
            position,
            tag: tag.into(),
        }
    }
}

pub trait PerceptionProvider: Send + Sync {
    fn enemies(&self) -> Vec<Sighting>;
    fn items(&self) -> Vec<Sighting>;
    fn npcs(&self) -> Vec<Sighting>;

    fn enemy_count(&self) -> usize {
        self.enemies().len()
    }

    fn item_count(&self) -> usize {
        self.items().len()
    }

    fn npc_count(&self) -> usize {
        self.npcs().len()
    }
}

/// Closest sighting to `from`, with its distance.
pub fn nearest(sightings: &[Sighting], from: Vec2) -> Option<(&Sighting, f32)> {
    sightings
        .iter()
        .map(|s| (s, s.position.distance(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
