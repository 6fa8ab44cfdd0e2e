//! Goal arbiter: a strategic → tactical → actionable goal chain.
//!
//! Every `goal_update_interval` seconds the arbiter captures a
//! [`GoalContext`], scores the four strategic kinds, picks the strictly
//! highest (declaration order breaks ties), then walks the tactical and
//! actionable decision trees. Between evaluations the chain is frozen and
//! only the time-based progress counters move.
mod context;
mod encoding;
mod personality;
pub mod planner;
mod progress;
pub mod scoring;
mod types;

pub use context::GoalContext;
pub use encoding::{GOAL_ENCODING_LEN, GoalEncoding, encode};
pub use personality::PersonalityProfile;
pub use progress::ProgressCounters;
pub use scoring::StrategicScores;
pub use types::{
    ActionableKind, Goal, GoalChain, GoalKind, GoalTier, StrategicKind, TacticalKind, TacticalType,
};

use tracing::{debug, info};

use crate::config::GoalConfig;
use crate::env::AgentEnv;
use crate::registry::AgentId;

/// Derives the full chain for one context.
///
/// Tactical and actionable goals inherit the strategic priority.
pub fn derive_chain(
    ctx: &GoalContext,
    personality: &PersonalityProfile,
    config: &GoalConfig,
) -> (GoalChain, StrategicScores) {
    let scores = StrategicScores::compute(ctx, personality);
    let (strategic, priority) = scores.select();
    let tactical = planner::select_tactical(strategic, ctx, config);
    let actionable = planner::select_actionable(tactical.tactical_type(), ctx, config);

    let chain = GoalChain {
        strategic: Goal::new(strategic, priority),
        tactical: Goal::new(tactical, priority),
        actionable: Goal::new(actionable, priority),
    };
    (chain, scores)
}

/// Per-agent goal arbiter.
pub struct GoalArbiter {
    id: AgentId,
    config: GoalConfig,
    env: AgentEnv,
    personality: PersonalityProfile,
    chain: GoalChain,
    scores: StrategicScores,
    progress: ProgressCounters,
    since_update: f32,
}

impl GoalArbiter {
    /// Creates the arbiter and evaluates immediately, so every tier holds a
    /// goal from the start.
    pub fn new(
        id: AgentId,
        config: GoalConfig,
        personality: PersonalityProfile,
        env: AgentEnv,
    ) -> Self {
        let ctx = GoalContext::capture(&env, id);
        let (chain, scores) = derive_chain(&ctx, &personality, &config);
        info!(
            target: "cognition::goals",
            agent = %id,
            strategic = %chain.strategic.kind,
            tactical = %chain.tactical.kind,
            actionable = %chain.actionable.kind,
            "initial goals"
        );
        Self {
            id,
            config,
            env,
            personality,
            chain,
            scores,
            progress: ProgressCounters::default(),
            since_update: 0.0,
        }
    }

    /// Advances progress and re-evaluates when the interval elapses.
    ///
    /// Returns true when a re-evaluation changed the strategic goal.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        self.progress.advance(dt, &self.config);

        self.since_update += dt;
        if self.since_update < self.config.goal_update_interval {
            return false;
        }
        self.since_update = 0.0;
        self.evaluate()
    }

    /// Re-derives the whole chain now. Returns true when the strategic kind
    /// changed.
    pub fn evaluate(&mut self) -> bool {
        let ctx = GoalContext::capture(&self.env, self.id);
        let (chain, scores) = derive_chain(&ctx, &self.personality, &self.config);

        debug!(
            target: "cognition::goals",
            agent = %self.id,
            survival = scores.survival,
            resource_accumulation = scores.resource_accumulation,
            social_bonding = scores.social_bonding,
            progression = scores.progression,
            "strategic priorities"
        );

        let changed = chain.strategic.kind != self.chain.strategic.kind;
        if changed {
            info!(
                target: "cognition::goals",
                agent = %self.id,
                from = %self.chain.strategic.kind,
                to = %chain.strategic.kind,
                priority = chain.strategic.priority,
                "strategic goal changed"
            );
        }
        if chain.tactical.kind != self.chain.tactical.kind
            || chain.actionable.kind != self.chain.actionable.kind
        {
            debug!(
                target: "cognition::goals",
                agent = %self.id,
                tactical = %chain.tactical.kind,
                actionable = %chain.actionable.kind,
                "plan updated"
            );
        }

        self.chain = chain;
        self.scores = scores;
        changed
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn strategic(&self) -> Goal<StrategicKind> {
        self.chain.strategic
    }

    pub fn tactical(&self) -> Goal<TacticalKind> {
        self.chain.tactical
    }

    pub fn actionable(&self) -> Goal<ActionableKind> {
        self.chain.actionable
    }

    pub fn goal_chain(&self) -> GoalChain {
        self.chain
    }

    /// Scores from the latest evaluation.
    pub fn scores(&self) -> StrategicScores {
        self.scores
    }

    pub fn progress(&self) -> ProgressCounters {
        self.progress
    }

    pub fn personality(&self) -> &PersonalityProfile {
        &self.personality
    }

    pub fn goal_encoding(&self) -> GoalEncoding {
        encode(&self.chain, &self.progress, &self.personality)
    }
}

impl std::fmt::Debug for GoalArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalArbiter")
            .field("id", &self.id)
            .field("chain", &self.chain)
            .field("progress", &self.progress)
            .field("personality", &self.personality)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::memory::{InMemoryExploration, InMemoryStats};

    #[test]
    fn empty_env_still_holds_every_tier() {
        let arbiter = GoalArbiter::new(
            AgentId(1),
            GoalConfig::default(),
            PersonalityProfile::default(),
            AgentEnv::empty(),
        );
        // Full neutral meters give resources 0.3 against exploration's 0.15.
        assert_eq!(
            arbiter.strategic().kind,
            StrategicKind::ResourceAccumulation
        );
        assert_eq!(arbiter.tactical().kind, TacticalKind::ExploreForMoney);
        assert_eq!(arbiter.actionable().kind, ActionableKind::MoveToUnexplored);
    }

    #[test]
    fn goals_only_change_on_the_interval() {
        let stats = Arc::new(InMemoryStats::default());
        let env = AgentEnv::empty()
            .with_stats(stats.clone())
            .with_exploration(Arc::new(InMemoryExploration::new(true, 0.0)));
        let mut arbiter = GoalArbiter::new(
            AgentId(1),
            GoalConfig::default(),
            PersonalityProfile::default(),
            env,
        );
        assert_eq!(arbiter.strategic().kind, StrategicKind::Progression);

        stats.update(|s| s.health = 10.0);
        assert!(!arbiter.tick(1.0));
        assert_eq!(arbiter.strategic().kind, StrategicKind::Progression);

        assert!(arbiter.tick(1.0));
        assert_eq!(arbiter.strategic().kind, StrategicKind::Survival);
        assert_eq!(arbiter.tactical().kind, TacticalKind::ItemHealing);
    }

    #[test]
    fn progress_survives_goal_changes() {
        let stats = Arc::new(InMemoryStats::default());
        let env = AgentEnv::empty().with_stats(stats.clone());
        let mut arbiter = GoalArbiter::new(
            AgentId(1),
            GoalConfig::default(),
            PersonalityProfile::default(),
            env,
        );
        arbiter.tick(1.0);
        let before = arbiter.progress().actionable;
        stats.update(|s| s.health = 5.0);
        arbiter.tick(1.0);
        assert!(arbiter.progress().actionable > before);
    }
}
