//! Action vectors as emitted by the policy, and the records the monitor keeps.

use bitflags::bitflags;

use crate::geometry::Vec2;

/// Number of discrete branches in an action vector.
pub const ACTION_ARITY: usize = 5;

/// Fixed-arity action vector: `[move, interact, item, communicate, combat]`.
///
/// Each branch holds the policy's discrete choice; zero means "no command"
/// on that branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionVector(pub [i32; ACTION_ARITY]);

impl ActionVector {
    pub const MOVE: usize = 0;
    pub const INTERACT: usize = 1;
    pub const ITEM: usize = 2;
    pub const COMMUNICATE: usize = 3;
    pub const COMBAT: usize = 4;

    pub const IDLE: ActionVector = ActionVector([0; ACTION_ARITY]);

    pub const fn new(
        movement: i32,
        interact: i32,
        item: i32,
        communicate: i32,
        combat: i32,
    ) -> Self {
        Self([movement, interact, item, communicate, combat])
    }

    /// Builds a vector from raw policy output of any length.
    ///
    /// Missing branches default to zero and extra values are ignored, so a
    /// truncated or padded buffer never fails ingestion.
    pub fn from_slice(raw: &[i32]) -> Self {
        let mut values = [0; ACTION_ARITY];
        for (slot, value) in values.iter_mut().zip(raw) {
            *slot = *value;
        }
        Self(values)
    }

    pub const fn movement(&self) -> i32 {
        self.0[Self::MOVE]
    }

    pub const fn combat(&self) -> i32 {
        self.0[Self::COMBAT]
    }

    /// Which branches carry a non-zero command.
    pub fn channels(&self) -> ActionChannels {
        let mut channels = ActionChannels::empty();
        for (index, flag) in ActionChannels::BY_INDEX.iter().enumerate() {
            if self.0[index] != 0 {
                channels |= *flag;
            }
        }
        channels
    }
}

impl From<[i32; ACTION_ARITY]> for ActionVector {
    fn from(values: [i32; ACTION_ARITY]) -> Self {
        Self(values)
    }
}

bitflags! {
    /// Set of action branches that issued a command.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionChannels: u8 {
        const MOVE = 1 << 0;
        const INTERACT = 1 << 1;
        const ITEM = 1 << 2;
        const COMMUNICATE = 1 << 3;
        const COMBAT = 1 << 4;
    }
}

impl ActionChannels {
    const BY_INDEX: [ActionChannels; ACTION_ARITY] = [
        ActionChannels::MOVE,
        ActionChannels::INTERACT,
        ActionChannels::ITEM,
        ActionChannels::COMMUNICATE,
        ActionChannels::COMBAT,
    ];

    /// True if any branch that physically changes the world was used.
    pub fn moves_or_fights(self) -> bool {
        self.intersects(ActionChannels::MOVE | ActionChannels::COMBAT)
    }
}

/// One recorded decision of the agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub action: ActionVector,
    /// Monitor clock in seconds when the action was recorded.
    pub timestamp: f32,
    pub position: Vec2,
    pub health: f32,
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_pads_and_truncates() {
        assert_eq!(ActionVector::from_slice(&[1, 2]), ActionVector::new(1, 2, 0, 0, 0));
        assert_eq!(
            ActionVector::from_slice(&[1, 2, 3, 4, 5, 6, 7]),
            ActionVector::new(1, 2, 3, 4, 5)
        );
        assert_eq!(ActionVector::from_slice(&[]), ActionVector::IDLE);
    }

    #[test]
    fn channels_follow_nonzero_branches() {
        let channels = ActionVector::new(0, 1, 0, 0, 2).channels();
        assert_eq!(channels, ActionChannels::INTERACT | ActionChannels::COMBAT);
        assert!(channels.moves_or_fights());
        assert!(!ActionVector::new(0, 1, 1, 1, 0).channels().moves_or_fights());
    }
}
