//! One agent's monitor and arbiter driven together.

use rand::Rng;

use crate::action::ActionVector;
use crate::config::CognitionConfig;
use crate::env::AgentEnv;
use crate::error::RegistryError;
use crate::goals::{GoalArbiter, PersonalityProfile};
use crate::monitor::BehaviorMonitor;
use crate::registry::{AgentId, AgentRegistry};

/// Both subsystems of one agent sharing one environment.
///
/// The monitor and the arbiter never read each other; the mind only
/// sequences them and mirrors the agent into the registry.
#[derive(Debug)]
pub struct AgentMind {
    id: AgentId,
    env: AgentEnv,
    monitor: BehaviorMonitor,
    arbiter: GoalArbiter,
}

impl AgentMind {
    pub fn new(
        id: AgentId,
        config: &CognitionConfig,
        personality: PersonalityProfile,
        env: AgentEnv,
    ) -> Self {
        Self {
            id,
            monitor: BehaviorMonitor::new(config.monitor.clone(), env.clone()),
            arbiter: GoalArbiter::new(id, config.goals.clone(), personality, env.clone()),
            env,
        }
    }

    /// Rolls a personality from `config.personality`.
    pub fn spawn<R: Rng + ?Sized>(
        id: AgentId,
        config: &CognitionConfig,
        env: AgentEnv,
        rng: &mut R,
    ) -> Self {
        let personality = PersonalityProfile::roll(&config.personality, rng);
        Self::new(id, config, personality, env)
    }

    /// Ticks the monitor, then the arbiter. Returns true when the strategic
    /// goal changed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.monitor.tick(dt);
        self.arbiter.tick(dt)
    }

    pub fn record_action(&mut self, raw: &[i32], context: &str) {
        self.monitor.record_action(raw, context);
    }

    pub fn record(&mut self, action: ActionVector, context: &str) {
        self.monitor.record(action, context);
    }

    /// Makes the current position and strategic goal visible to peers.
    pub fn publish(&self, registry: &AgentRegistry) -> Result<(), RegistryError> {
        registry.publish(
            self.id,
            self.env.position(),
            Some(self.arbiter.strategic().kind),
        )
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn env(&self) -> &AgentEnv {
        &self.env
    }

    pub fn monitor(&self) -> &BehaviorMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut BehaviorMonitor {
        &mut self.monitor
    }

    pub fn arbiter(&self) -> &GoalArbiter {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut GoalArbiter {
        &mut self.arbiter
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::env::memory::{InMemoryExploration, RecordingMovement};
    use crate::geometry::Vec2;
    use crate::goals::StrategicKind;
    use crate::registry::AgentDirectory;

    #[test]
    fn publish_mirrors_position_and_goal() {
        let registry = AgentRegistry::new();
        registry.register(AgentId(1), Vec2::ZERO).unwrap();
        registry.register(AgentId(2), Vec2::ZERO).unwrap();

        let env = AgentEnv::empty()
            .with_movement(Arc::new(RecordingMovement::anchored(Vec2::new(3.0, 4.0))))
            .with_exploration(Arc::new(InMemoryExploration::new(true, 0.0)));
        let mut rng = StdRng::seed_from_u64(3);
        let mind = AgentMind::spawn(AgentId(1), &CognitionConfig::default(), env, &mut rng);
        mind.publish(&registry).unwrap();

        let peers = registry.peers(AgentId(2));
        assert_eq!(peers[0].position, Vec2::new(3.0, 4.0));
        assert_eq!(peers[0].strategic, Some(StrategicKind::Progression));
    }

    #[test]
    fn publishing_an_unregistered_agent_fails() {
        let registry = AgentRegistry::new();
        let mind = AgentMind::new(
            AgentId(5),
            &CognitionConfig::default(),
            PersonalityProfile::default(),
            AgentEnv::empty(),
        );
        assert_eq!(
            mind.publish(&registry),
            Err(RegistryError::NotRegistered(AgentId(5)))
        );
    }
}
