//! Goal kinds for the three tiers of the hierarchy.
//!
//! Every kind enum is closed. Declaration order matters: it is the tie-break
//! order for strategic selection and the slot order of the one-hot blocks in
//! [`super::GoalEncoding`].

use std::fmt;

/// Level of the goal hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalTier {
    Strategic,
    Tactical,
    Actionable,
}

/// Behavior shared by the per-tier kind enums.
pub trait GoalKind: Copy + Eq + fmt::Debug + fmt::Display {
    const TIER: GoalTier;

    fn description(self) -> &'static str;
}

/// The active goal of one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal<K> {
    pub kind: K,
    pub priority: f32,
}

impl<K: GoalKind> Goal<K> {
    pub fn new(kind: K, priority: f32) -> Self {
        Self { kind, priority }
    }

    pub fn tier(&self) -> GoalTier {
        K::TIER
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}

impl<K: GoalKind> fmt::Display for Goal<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({:.2}) {}",
            K::TIER,
            self.kind,
            self.priority,
            self.kind.description()
        )
    }
}

// ============================================================================
// Strategic
// ============================================================================

/// Long-horizon intent.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategicKind {
    /// Keep health, hunger and thirst out of the danger zone.
    Survival,
    /// Build up gold, inventory and equipment.
    ResourceAccumulation,
    /// Keep in touch with other agents.
    SocialBonding,
    /// Advance toward the key destination or explore for it.
    Progression,
}

impl StrategicKind {
    pub const COUNT: usize = 4;

    /// All kinds in tie-break order.
    pub const fn all() -> [StrategicKind; Self::COUNT] {
        [
            StrategicKind::Survival,
            StrategicKind::ResourceAccumulation,
            StrategicKind::SocialBonding,
            StrategicKind::Progression,
        ]
    }

    /// Slot in the strategic one-hot block.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl GoalKind for StrategicKind {
    const TIER: GoalTier = GoalTier::Strategic;

    fn description(self) -> &'static str {
        match self {
            Self::Survival => "stay alive: restore health, food and water",
            Self::ResourceAccumulation => "gather gold, supplies and equipment",
            Self::SocialBonding => "maintain relationships with other agents",
            Self::Progression => "reach the destination or explore to find it",
        }
    }
}

// ============================================================================
// Tactical
// ============================================================================

/// Category a tactical goal belongs to; drives the actionable mapping.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TacticalType {
    Combat,
    Exploration,
    Trade,
    ResourceManagement,
    Communication,
}

impl TacticalType {
    pub const COUNT: usize = 5;

    pub const fn all() -> [TacticalType; Self::COUNT] {
        [
            TacticalType::Combat,
            TacticalType::Exploration,
            TacticalType::Trade,
            TacticalType::ResourceManagement,
            TacticalType::Communication,
        ]
    }

    /// Slot in the tactical one-hot block.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Medium-horizon plan serving the strategic goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TacticalKind {
    // Survival
    PaidHealing,
    ItemHealing,
    FreeWater,
    PaidFood,
    FightForMoney,
    PreventiveResupply,

    // Progression
    HeadToDestination,
    ExploreNewArea,

    // Resource accumulation
    PeerTradeForSpace,
    UpgradeCapacity,
    LiquidateItems,
    UrgentSupplyTrade,
    HuntForMoney,
    ExploreForMoney,
    PeerWeaponTrade,
    VendorEquipment,
    PassiveCollection,

    // Social bonding
    EmergencyHelpRequest,
    ShareNpcLocation,
    FaceToFaceContact,
    CombatInvite,
    DestinationCoordination,
    RelationshipMaintenance,
}

impl TacticalKind {
    pub const fn tactical_type(self) -> TacticalType {
        use TacticalKind::*;
        match self {
            PaidHealing | PaidFood | PreventiveResupply | PeerTradeForSpace | UpgradeCapacity
            | LiquidateItems | UrgentSupplyTrade | PeerWeaponTrade | VendorEquipment => {
                TacticalType::Trade
            }
            ItemHealing | PassiveCollection => TacticalType::ResourceManagement,
            FreeWater | HeadToDestination | ExploreNewArea | ExploreForMoney => {
                TacticalType::Exploration
            }
            FightForMoney | HuntForMoney => TacticalType::Combat,
            EmergencyHelpRequest | ShareNpcLocation | FaceToFaceContact | CombatInvite
            | DestinationCoordination | RelationshipMaintenance => TacticalType::Communication,
        }
    }
}

impl GoalKind for TacticalKind {
    const TIER: GoalTier = GoalTier::Tactical;

    fn description(self) -> &'static str {
        use TacticalKind::*;
        match self {
            PaidHealing => "buy healing from a healer",
            ItemHealing => "heal with an item from the inventory",
            FreeWater => "find a free water source",
            PaidFood => "buy food from a vendor",
            FightForMoney => "fight enemies to earn gold for supplies",
            PreventiveResupply => "restock supplies before they run low",
            HeadToDestination => "travel to the known destination",
            ExploreNewArea => "explore unvisited areas",
            PeerTradeForSpace => "trade surplus items with a nearby peer",
            UpgradeCapacity => "buy a larger inventory",
            LiquidateItems => "sell items to free space",
            UrgentSupplyTrade => "trade with a nearby peer for urgent supplies",
            HuntForMoney => "hunt enemies for gold",
            ExploreForMoney => "explore to find gold and loot",
            PeerWeaponTrade => "trade for a better weapon with a nearby peer",
            VendorEquipment => "buy better equipment from a vendor",
            PassiveCollection => "collect items along the way",
            EmergencyHelpRequest => "ask peers for emergency help",
            ShareNpcLocation => "tell peers where an NPC is",
            FaceToFaceContact => "meet a nearby peer in person",
            CombatInvite => "invite peers to fight together",
            DestinationCoordination => "coordinate travel to the destination",
            RelationshipMaintenance => "send a friendly message",
        }
    }
}

// ============================================================================
// Actionable
// ============================================================================

/// Immediate action the policy should take next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionableKind {
    AttackNearestEnemy,
    ApproachEnemy,
    MoveToUnexplored,
    InteractWithNpc,
    SearchForNpc,
    UseRecoveryItem,
    PickUpItem,
    Interact,
    RandomMove,
}

impl GoalKind for ActionableKind {
    const TIER: GoalTier = GoalTier::Actionable;

    fn description(self) -> &'static str {
        match self {
            Self::AttackNearestEnemy => "attack the nearest enemy",
            Self::ApproachEnemy => "move toward the nearest enemy",
            Self::MoveToUnexplored => "move toward unexplored ground",
            Self::InteractWithNpc => "interact with the nearest NPC",
            Self::SearchForNpc => "search for an NPC",
            Self::UseRecoveryItem => "use a recovery item",
            Self::PickUpItem => "pick up a nearby item",
            Self::Interact => "interact",
            Self::RandomMove => "move in a random direction",
        }
    }
}

/// The active goal of every tier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalChain {
    pub strategic: Goal<StrategicKind>,
    pub tactical: Goal<TacticalKind>,
    pub actionable: Goal<ActionableKind>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn strategic_order_is_tie_break_order() {
        let indices: Vec<usize> = StrategicKind::all().iter().map(|k| k.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(StrategicKind::Survival < StrategicKind::Progression);
    }

    #[test]
    fn kinds_parse_from_snake_case() {
        assert_eq!(
            StrategicKind::from_str("resource_accumulation"),
            Ok(StrategicKind::ResourceAccumulation)
        );
        assert_eq!(TacticalKind::ItemHealing.to_string(), "item_healing");
        assert_eq!(
            ActionableKind::from_str("USE_RECOVERY_ITEM"),
            Ok(ActionableKind::UseRecoveryItem)
        );
    }

    #[test]
    fn tactical_types_cover_every_slot() {
        let kinds = [
            TacticalKind::FightForMoney,
            TacticalKind::ExploreNewArea,
            TacticalKind::PaidFood,
            TacticalKind::ItemHealing,
            TacticalKind::CombatInvite,
        ];
        let slots: Vec<usize> = kinds.iter().map(|k| k.tactical_type().index()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn goal_reports_its_tier() {
        let goal = Goal::new(ActionableKind::Interact, 0.4);
        assert_eq!(goal.tier(), GoalTier::Actionable);
        assert_eq!(goal.description(), "interact");
    }
}
