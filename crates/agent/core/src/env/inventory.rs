//! Inventory occupancy and currency.

/// Contents of one inventory slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotView {
    pub quantity: u32,
}

impl SlotView {
    pub const fn is_occupied(&self) -> bool {
        self.quantity > 0
    }
}

pub trait InventoryProvider: Send + Sync {
    fn slot_count(&self) -> usize;
    fn slot(&self, index: usize) -> Option<SlotView>;
    /// Damage value of the equipped weapon, zero when unarmed.
    fn weapon_damage(&self) -> f32;

    fn occupied_slots(&self) -> usize {
        (0..self.slot_count())
            .filter_map(|i| self.slot(i))
            .filter(SlotView::is_occupied)
            .count()
    }

    /// Sum of quantities across all slots.
    fn total_items(&self) -> u32 {
        (0..self.slot_count())
            .filter_map(|i| self.slot(i))
            .map(|s| s.quantity)
            .sum()
    }

    /// Occupied slots over slot count, `0.0` for an inventory without slots.
    fn fullness(&self) -> f32 {
        let slots = self.slot_count();
        if slots == 0 {
            return 0.0;
        }
        self.occupied_slots() as f32 / slots as f32
    }
}

pub trait CurrencyProvider: Send + Sync {
    fn balance(&self) -> u32;
}
