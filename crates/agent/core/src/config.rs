//! Tunable parameters for the monitor, the arbiter and personality rolls.
//!
//! Every struct carries working defaults; hosts typically load overrides
//! from a TOML file (see `agent-content`) and call [`CognitionConfig::validate`]
//! once before spawning agents.

use crate::error::ConfigError;

/// Complete per-agent cognition configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CognitionConfig {
    pub monitor: MonitorConfig,
    pub goals: GoalConfig,
    pub personality: TraitRanges,
}

impl CognitionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.monitor.validate()?;
        self.goals.validate()?;
        self.personality.validate()
    }
}

/// Behavior monitor tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Seconds between position samples.
    pub position_check_interval: f32,
    /// Maximum pairwise spread (world units) that still counts as stationary.
    pub stuck_threshold: f32,
    /// Position window size, and consecutive stationary checks before stuck.
    pub stuck_check_count: usize,
    pub action_history_size: usize,
    pub pattern_min_length: usize,
    pub pattern_max_length: usize,
    /// Scale of the logarithmic repetition term; negative means penalty.
    pub repetition_penalty: f32,
    /// Seconds before the effectiveness progress anchor is re-placed.
    pub ineffective_action_window: f32,
    pub stuck_reward: f32,
    pub loop_break_reward: f32,
    /// Window after a forced move during which the guard may repeat it.
    pub force_move_cooldown: f32,
    pub force_move_max_repeats: u32,
    /// Quiet period after which the forced-move repetition count resets.
    pub force_move_reset_after: f32,
    /// Seed for forced-move directions; entropy when absent.
    pub rng_seed: Option<u64>,
}

impl MonitorConfig {
    /// Upper bound on distinct patterns tracked in the frequency map.
    pub const MAX_TRACKED_PATTERNS: usize = 20;
    /// Upper bound on pattern length (pattern keys are fixed-capacity).
    pub const MAX_PATTERN_LENGTH: usize = 16;

    pub const DEFAULT_POSITION_CHECK_INTERVAL: f32 = 0.3;
    pub const DEFAULT_STUCK_THRESHOLD: f32 = 0.5;
    pub const DEFAULT_STUCK_CHECK_COUNT: usize = 5;
    pub const DEFAULT_ACTION_HISTORY_SIZE: usize = 100;

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("position_check_interval", self.position_check_interval)?;
        positive("ineffective_action_window", self.ineffective_action_window)?;
        positive("force_move_cooldown", self.force_move_cooldown)?;
        positive("force_move_reset_after", self.force_move_reset_after)?;
        non_negative("stuck_threshold", self.stuck_threshold)?;

        if self.stuck_check_count < 2 {
            return Err(ConfigError::CapacityTooSmall {
                field: "stuck_check_count",
                min: 2,
                value: self.stuck_check_count,
            });
        }

        let limit = Self::MAX_PATTERN_LENGTH;
        if self.pattern_min_length == 0
            || self.pattern_min_length > self.pattern_max_length
            || self.pattern_max_length > limit
        {
            return Err(ConfigError::PatternLengthBounds {
                min: self.pattern_min_length,
                max: self.pattern_max_length,
                limit,
            });
        }

        let min_history = self.pattern_max_length * 2;
        if self.action_history_size < min_history {
            return Err(ConfigError::CapacityTooSmall {
                field: "action_history_size",
                min: min_history,
                value: self.action_history_size,
            });
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            position_check_interval: Self::DEFAULT_POSITION_CHECK_INTERVAL,
            stuck_threshold: Self::DEFAULT_STUCK_THRESHOLD,
            stuck_check_count: Self::DEFAULT_STUCK_CHECK_COUNT,
            action_history_size: Self::DEFAULT_ACTION_HISTORY_SIZE,
            pattern_min_length: 2,
            pattern_max_length: 4,
            repetition_penalty: -0.1,
            ineffective_action_window: 5.0,
            stuck_reward: -2.0,
            loop_break_reward: 0.2,
            force_move_cooldown: 2.0,
            force_move_max_repeats: 5,
            force_move_reset_after: 3.0,
            rng_seed: None,
        }
    }
}

/// Goal arbiter tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GoalConfig {
    /// Seconds between goal re-evaluations.
    pub goal_update_interval: f32,
    /// Progress gained per second on each tier.
    pub actionable_progress_rate: f32,
    pub tactical_progress_rate: f32,
    pub strategic_progress_rate: f32,
    /// Added to the tier above when a counter wraps.
    pub promotion_increment: f32,
    /// Distance within which a peer counts as reachable for trade or contact.
    pub contact_range: f32,
    /// Distance within which an enemy can be attacked directly.
    pub attack_range: f32,
    pub heal_cost: u32,
    pub food_cost: u32,
    pub resupply_cost: u32,
    pub capacity_upgrade_cost: u32,
    /// Gold at which the agent switches from earning to equipment investment.
    pub investment_threshold: u32,
    /// Weapon damage below which equipment investment is worthwhile.
    pub weapon_damage_target: f32,
}

impl GoalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("goal_update_interval", self.goal_update_interval)?;
        non_negative("actionable_progress_rate", self.actionable_progress_rate)?;
        non_negative("tactical_progress_rate", self.tactical_progress_rate)?;
        non_negative("strategic_progress_rate", self.strategic_progress_rate)?;
        non_negative("promotion_increment", self.promotion_increment)?;
        non_negative("contact_range", self.contact_range)?;
        non_negative("attack_range", self.attack_range)?;
        non_negative("weapon_damage_target", self.weapon_damage_target)
    }
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            goal_update_interval: 2.0,
            actionable_progress_rate: 0.2,
            tactical_progress_rate: 0.05,
            strategic_progress_rate: 0.01,
            promotion_increment: 0.1,
            contact_range: 10.0,
            attack_range: 2.0,
            heal_cost: 50,
            food_cost: 20,
            resupply_cost: 100,
            capacity_upgrade_cost: 150,
            investment_threshold: 300,
            weapon_damage_target: 20.0,
        }
    }
}

/// Inclusive range a personality trait is rolled from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitRange {
    pub min: f32,
    pub max: f32,
}

impl TraitRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, trait_name: &'static str) -> Result<(), ConfigError> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit(self.min) || !in_unit(self.max) || self.min > self.max {
            return Err(ConfigError::TraitRange {
                trait_name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Per-trait roll ranges for [`crate::PersonalityProfile::roll`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraitRanges {
    pub aggression: TraitRange,
    pub curiosity: TraitRange,
    pub sociability: TraitRange,
    pub caution: TraitRange,
    pub leadership: TraitRange,
}

impl TraitRanges {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aggression.validate("aggression")?;
        self.curiosity.validate("curiosity")?;
        self.sociability.validate("sociability")?;
        self.caution.validate("caution")?;
        self.leadership.validate("leadership")
    }
}

impl Default for TraitRanges {
    fn default() -> Self {
        Self {
            aggression: TraitRange::new(0.2, 0.8),
            curiosity: TraitRange::new(0.3, 0.9),
            sociability: TraitRange::new(0.3, 0.9),
            caution: TraitRange::new(0.2, 0.8),
            leadership: TraitRange::new(0.1, 0.7),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveInterval { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { field, value })
    }
}
