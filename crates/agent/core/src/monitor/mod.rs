//! Behavior monitor: stuck detection, loop detection and effectiveness.
//!
//! The monitor samples the agent's position every `position_check_interval`
//! seconds and ingests every action the host records. When the agent is
//! stuck it remembers the situation, pushes a penalty and a loop-break bonus
//! to the reward sink, clears its detectors, and forces a random compass
//! move. The scalar returned by [`BehaviorMonitor::behavior_penalty`] is
//! computed on demand and never applied by the monitor itself.
mod classify;
mod effectiveness;
mod failure;
mod force;
mod pattern;
mod stuck;
mod suggestion;
mod window;

pub use classify::{Classification, classify, classify_movement, with_combat_override};
pub use effectiveness::{EffectivenessTracker, NEUTRAL_EFFECTIVENESS};
pub use failure::{FailureContextKey, FailureMemory, FailureRecord};
pub use force::ForceGuard;
pub use pattern::{PatternDetector, PatternFrequencies, PatternKey, PatternMatch};
pub use stuck::{StuckDetector, StuckSample};
pub use suggestion::ActionSuggestion;
pub use window::BoundedWindow;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::action::{ActionRecord, ActionVector};
use crate::config::MonitorConfig;
use crate::env::AgentEnv;
use crate::geometry::{Vec2, positional_variance, random_compass_direction};

const STUCK_PENALTY: f32 = -1.0;
const LOW_EFFECTIVENESS: f32 = 0.1;
const LOW_EFFECTIVENESS_SCALE: f32 = 0.1;
const EXPLORATION_VARIANCE: f32 = 2.0;
const EXPLORATION_BONUS: f32 = 0.05;

/// Why a forced move was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForcedMoveCause {
    /// The one-shot move that follows stuck detection.
    StuckDetected,
    /// A guard repeat while the agent remains stuck.
    StillStuck,
    /// A movement pattern that makes no headway.
    PushingIntoWall,
}

/// State transitions queued for the host.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonitorEvent {
    StuckDetected {
        at: f32,
        position: Vec2,
        spread: f32,
        context: FailureContextKey,
        failures_here: u32,
    },
    LoopBroken {
        at: f32,
    },
    ForcedMove {
        at: f32,
        direction: Vec2,
        cause: ForcedMoveCause,
    },
    PatternDetected {
        at: f32,
        pattern: PatternKey,
        occurrences: u32,
        counterproductive: bool,
    },
}

/// Serializable snapshot of the monitor's public state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorReport {
    pub is_stuck: bool,
    pub is_repeating_pattern: bool,
    pub effectiveness: f32,
    pub current_pattern: String,
    pub classification: Option<String>,
    pub penalty: f32,
    pub tracked_patterns: usize,
    pub failure_contexts: usize,
    pub suggestion: ActionSuggestion,
}

/// Per-agent behavior monitor.
pub struct BehaviorMonitor {
    config: MonitorConfig,
    env: AgentEnv,
    stuck: StuckDetector,
    patterns: PatternDetector,
    classification: Option<Classification>,
    effectiveness: EffectivenessTracker,
    failures: FailureMemory,
    guard: ForceGuard,
    rng: StdRng,
    clock: f32,
    since_check: f32,
    events: Vec<MonitorEvent>,
}

impl BehaviorMonitor {
    /// Builds a monitor from `config` as given. An invalid config is logged,
    /// not rejected; a non-positive check interval disables position sampling.
    pub fn new(config: MonitorConfig, env: AgentEnv) -> Self {
        if let Err(err) = config.validate() {
            warn!(target: "cognition::monitor", %err, "monitor config is invalid");
        }
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            stuck: StuckDetector::new(config.stuck_threshold, config.stuck_check_count),
            patterns: PatternDetector::new(
                config.action_history_size,
                config.pattern_min_length,
                config.pattern_max_length,
            ),
            classification: None,
            effectiveness: EffectivenessTracker::new(config.ineffective_action_window),
            failures: FailureMemory::default(),
            guard: ForceGuard::new(
                config.force_move_cooldown,
                config.force_move_max_repeats,
                config.force_move_reset_after,
            ),
            rng,
            clock: 0.0,
            since_check: 0.0,
            events: Vec::new(),
            config,
            env,
        }
    }

    /// Advances the monitor clock by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.clock += dt;

        let effectiveness = self.effectiveness.update(&self.env, dt);
        trace!(
            target: "cognition::monitor",
            effectiveness,
            clock = self.clock,
            "effectiveness sampled"
        );

        let interval = self.config.position_check_interval;
        if !interval.is_finite() || interval <= 0.0 {
            return;
        }
        self.since_check += dt;
        while self.since_check >= interval {
            self.since_check -= interval;
            self.check_position();
        }
    }

    /// Records one action. Missing trailing fields are zero, extras ignored.
    pub fn record_action(&mut self, raw: &[i32], context: &str) {
        self.record(ActionVector::from_slice(raw), context);
    }

    pub fn record(&mut self, action: ActionVector, context: &str) {
        let record = ActionRecord {
            action,
            timestamp: self.clock,
            position: self.env.position(),
            health: self.env.health(),
            context: context.to_owned(),
        };

        let previous = self.patterns.current().cloned();
        let Some(found) = self.patterns.observe(record) else {
            self.classification = None;
            return;
        };

        let frequency = self.patterns.frequency(&found.key);
        let positions = self.stuck.positions();
        let enemies_nearby = self.env.enemy_count() > 0;
        let movement = classify_movement(&found.key, &positions, frequency);
        let classification = with_combat_override(movement, &found.key, enemies_nearby);
        self.classification = Some(classification);

        if previous.as_ref() != Some(&found.key) {
            debug!(
                target: "cognition::monitor",
                pattern = %found.key,
                occurrences = found.occurrences,
                classification = %classification,
                "repeating pattern detected"
            );
            self.events.push(MonitorEvent::PatternDetected {
                at: self.clock,
                pattern: found.key.clone(),
                occurrences: found.occurrences,
                counterproductive: classification.is_counterproductive(),
            });
        }

        if movement == Classification::PushingIntoWall {
            self.force_move(ForcedMoveCause::PushingIntoWall);
        }
    }

    fn check_position(&mut self) {
        let position = self.env.position();
        match self.stuck.sample(position) {
            StuckSample::Detected { spread } => self.on_stuck_detected(position, spread),
            _ => {
                if self.guard.should_repeat(self.clock, self.stuck.is_stuck()) {
                    self.force_move(ForcedMoveCause::StillStuck);
                }
            }
        }
    }

    fn on_stuck_detected(&mut self, position: Vec2, spread: f32) {
        let context = FailureContextKey::observe(&self.env);
        let record = self.failures.record(context, self.clock);
        warn!(
            target: "cognition::monitor",
            x = position.x,
            y = position.y,
            spread,
            failures_here = record.count,
            "agent stuck"
        );
        self.events.push(MonitorEvent::StuckDetected {
            at: self.clock,
            position,
            spread,
            context,
            failures_here: record.count,
        });
        self.env.reward(self.config.stuck_reward);

        self.break_loop();
        self.force_move(ForcedMoveCause::StuckDetected);
    }

    /// Clears positions, stuck counter and pattern state, then rewards the
    /// break. The stuck flag itself stays latched until the agent moves.
    fn break_loop(&mut self) {
        self.stuck.clear_window();
        self.patterns.break_loop();
        self.classification = None;
        info!(target: "cognition::monitor", clock = self.clock, "loop broken");
        self.events.push(MonitorEvent::LoopBroken { at: self.clock });
        self.env.reward(self.config.loop_break_reward);
    }

    fn force_move(&mut self, cause: ForcedMoveCause) {
        let direction = random_compass_direction(&mut self.rng);
        if !self.env.apply_move(direction) {
            debug!(
                target: "cognition::monitor",
                cause = %cause,
                "no movement controller, forced move dropped"
            );
            return;
        }
        self.guard.note_forced(self.clock);
        debug!(
            target: "cognition::monitor",
            cause = %cause,
            dx = direction.x,
            dy = direction.y,
            "forced move"
        );
        self.events.push(MonitorEvent::ForcedMove {
            at: self.clock,
            direction,
            cause,
        });
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_stuck(&self) -> bool {
        self.stuck.is_stuck()
    }

    pub fn is_repeating_pattern(&self) -> bool {
        self.patterns.is_repeating()
    }

    pub fn current_effectiveness(&self) -> f32 {
        self.effectiveness.current()
    }

    pub fn current_pattern(&self) -> Option<&PatternKey> {
        self.patterns.current()
    }

    /// Current pattern rendered as text, empty when nothing repeats.
    pub fn current_pattern_label(&self) -> String {
        self.patterns
            .current()
            .map(|key| key.to_string())
            .unwrap_or_default()
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    pub fn pattern_frequency(&self, key: &PatternKey) -> u32 {
        self.patterns.frequency(key)
    }

    pub fn tracked_patterns(&self) -> usize {
        self.patterns.frequencies().len()
    }

    /// Sum of the stuck, repetition, low-effectiveness and exploration
    /// terms. Pure: reads state only.
    pub fn behavior_penalty(&self) -> f32 {
        let stuck = self.is_stuck();
        let effectiveness = self.current_effectiveness();
        let mut penalty = 0.0;

        if stuck {
            penalty += STUCK_PENALTY;
        }

        if let (Some(key), Some(classification)) = (self.current_pattern(), self.classification)
        {
            if classification.is_counterproductive() {
                let frequency = self.patterns.frequency(key) as f32;
                penalty += self.config.repetition_penalty * (frequency + 1.0).ln();
            }
        }

        if effectiveness < LOW_EFFECTIVENESS {
            penalty -= LOW_EFFECTIVENESS_SCALE * (1.0 - effectiveness);
        }

        if !stuck && positional_variance(&self.stuck.positions()) > EXPLORATION_VARIANCE {
            penalty += EXPLORATION_BONUS;
        }

        penalty
    }

    pub fn action_suggestion(&self) -> ActionSuggestion {
        ActionSuggestion::derive(
            self.is_stuck(),
            self.is_repeating_pattern(),
            self.current_effectiveness(),
        )
    }

    pub fn has_failed_in_context(&self, key: &FailureContextKey) -> bool {
        self.failures.has_failed(key)
    }

    pub fn failure_count(&self, key: &FailureContextKey) -> u32 {
        self.failures.count(key)
    }

    /// Failure key for the situation the agent is in right now.
    pub fn current_context(&self) -> FailureContextKey {
        FailureContextKey::observe(&self.env)
    }

    pub fn failure_contexts(&self) -> usize {
        self.failures.len()
    }

    /// Recorded actions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ActionRecord> {
        self.patterns.history().iter()
    }

    /// Seconds of simulated time seen by this monitor.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<MonitorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn report(&self) -> MonitorReport {
        MonitorReport {
            is_stuck: self.is_stuck(),
            is_repeating_pattern: self.is_repeating_pattern(),
            effectiveness: self.current_effectiveness(),
            current_pattern: self.current_pattern_label(),
            classification: self.classification.map(|c| c.to_string()),
            penalty: self.behavior_penalty(),
            tracked_patterns: self.tracked_patterns(),
            failure_contexts: self.failure_contexts(),
            suggestion: self.action_suggestion(),
        }
    }
}

impl std::fmt::Debug for BehaviorMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorMonitor")
            .field("clock", &self.clock)
            .field("is_stuck", &self.is_stuck())
            .field("is_repeating_pattern", &self.is_repeating_pattern())
            .field("effectiveness", &self.current_effectiveness())
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::memory::{
        InMemoryPerception, InMemoryStats, PerceptionState, RecordingMovement, RecordingRewards,
    };
    use crate::env::Sighting;

    fn seeded() -> MonitorConfig {
        MonitorConfig {
            rng_seed: Some(7),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn missing_collaborators_are_neutral() {
        let mut monitor = BehaviorMonitor::new(seeded(), AgentEnv::empty());
        for _ in 0..100 {
            monitor.tick(0.1);
        }
        assert_eq!(monitor.current_effectiveness(), NEUTRAL_EFFECTIVENESS);
        // Without a body every sample is the origin, so the agent is stuck
        // but no forced move can be issued.
        assert!(monitor.is_stuck());
        assert!(
            monitor
                .drain_events()
                .iter()
                .all(|e| !matches!(e, MonitorEvent::ForcedMove { .. }))
        );
    }

    #[test]
    fn short_records_are_zero_padded() {
        let mut monitor = BehaviorMonitor::new(seeded(), AgentEnv::empty());
        monitor.record_action(&[1], "partial");
        let record = monitor.history().next().cloned().expect("recorded");
        assert_eq!(record.action, ActionVector::new(1, 0, 0, 0, 0));
        assert_eq!(record.context, "partial");
    }

    #[test]
    fn wall_pattern_forces_a_move() {
        let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
        let env = AgentEnv::empty().with_movement(body.clone());
        let mut monitor = BehaviorMonitor::new(seeded(), env);

        // Fill the position window without reaching stuck detection.
        for _ in 0..5 {
            monitor.tick(0.3);
        }
        assert!(!monitor.is_stuck());

        let push = ActionVector::new(1, 0, 0, 0, 0);
        let turn = ActionVector::new(2, 0, 0, 0, 0);
        for action in [push, turn, push, turn] {
            monitor.record(action, "walk");
        }
        assert_eq!(
            monitor.classification(),
            Some(Classification::PushingIntoWall)
        );
        assert_eq!(body.command_count(), 1);
    }

    #[test]
    fn combat_pattern_near_enemies_is_productive() {
        let perception = Arc::new(InMemoryPerception::new(PerceptionState {
            enemies: vec![Sighting::new(Vec2::new(1.0, 0.0), "wolf")],
            ..PerceptionState::default()
        }));
        let env = AgentEnv::empty()
            .with_perception(perception)
            .with_movement(Arc::new(RecordingMovement::anchored(Vec2::ZERO)));
        let mut monitor = BehaviorMonitor::new(seeded(), env);

        let strike = ActionVector::new(0, 0, 0, 0, 1);
        let wait = ActionVector::new(0, 0, 0, 0, 2);
        for action in [strike, wait, strike, wait, strike, wait] {
            monitor.record(action, "fight");
        }
        assert!(monitor.is_repeating_pattern());
        assert_eq!(
            monitor.classification(),
            Some(Classification::EngagedInCombat)
        );
    }

    #[test]
    fn exploration_bonus_when_window_spreads() {
        let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
        let env = AgentEnv::empty()
            .with_stats(Arc::new(InMemoryStats::default()))
            .with_movement(body.clone());
        let mut monitor = BehaviorMonitor::new(seeded(), env);

        for i in 0..5 {
            body.set_position(Vec2::new(i as f32 * 3.0, 0.0));
            monitor.tick(0.3);
        }
        assert!(!monitor.is_stuck());
        let penalty = monitor.behavior_penalty();
        assert!((penalty - EXPLORATION_BONUS).abs() < 1e-6, "{penalty}");
    }

    #[test]
    fn stuck_rewards_are_pushed_in_order() {
        let rewards = Arc::new(RecordingRewards::new());
        let env = AgentEnv::empty()
            .with_movement(Arc::new(RecordingMovement::anchored(Vec2::ZERO)))
            .with_rewards(rewards.clone());
        let mut monitor = BehaviorMonitor::new(seeded(), env);

        while !monitor.is_stuck() {
            monitor.tick(0.3);
        }
        assert_eq!(rewards.deltas(), vec![-2.0, 0.2]);

        let events = monitor.drain_events();
        assert!(matches!(events[0], MonitorEvent::StuckDetected { .. }));
        assert!(matches!(events[1], MonitorEvent::LoopBroken { .. }));
        assert!(matches!(
            events[2],
            MonitorEvent::ForcedMove {
                cause: ForcedMoveCause::StuckDetected,
                ..
            }
        ));
        assert!(monitor.drain_events().is_empty());
    }

    fn forced_moves(events: &[MonitorEvent], wanted: ForcedMoveCause) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| match e {
                MonitorEvent::ForcedMove { at, cause, .. } if *cause == wanted => Some(*at),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn non_positive_check_interval_disables_sampling() {
        for interval in [0.0, -0.3, f32::NAN] {
            let config = MonitorConfig {
                position_check_interval: interval,
                ..seeded()
            };
            let env = AgentEnv::empty()
                .with_movement(Arc::new(RecordingMovement::anchored(Vec2::ZERO)));
            let mut monitor = BehaviorMonitor::new(config, env);

            for _ in 0..50 {
                monitor.tick(0.1);
            }
            assert!((monitor.clock() - 5.0).abs() < 1e-3);
            assert!(!monitor.is_stuck());
            assert!(monitor.drain_events().is_empty());
        }
    }

    #[test]
    fn wall_pattern_with_combat_near_enemies_still_forces_a_move() {
        let perception = Arc::new(InMemoryPerception::new(PerceptionState {
            enemies: vec![Sighting::new(Vec2::new(1.0, 0.0), "wolf")],
            ..PerceptionState::default()
        }));
        let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
        let env = AgentEnv::empty()
            .with_perception(perception)
            .with_movement(body.clone());
        let mut monitor = BehaviorMonitor::new(seeded(), env);

        for _ in 0..5 {
            monitor.tick(0.3);
        }
        assert!(!monitor.is_stuck());

        let swing = ActionVector::new(1, 0, 0, 0, 1);
        let step = ActionVector::new(2, 0, 0, 0, 0);
        for action in [swing, step, swing, step] {
            monitor.record(action, "skirmish");
        }
        assert_eq!(
            monitor.classification(),
            Some(Classification::EngagedInCombat)
        );
        assert_eq!(body.command_count(), 1);
        let events = monitor.drain_events();
        assert_eq!(
            forced_moves(&events, ForcedMoveCause::PushingIntoWall).len(),
            1
        );
    }

    #[test]
    fn guard_repeats_forced_moves_while_stuck() {
        let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
        let env = AgentEnv::empty().with_movement(body.clone());
        let mut monitor = BehaviorMonitor::new(seeded(), env);
        let config = monitor.config().clone();

        while !monitor.is_stuck() {
            monitor.tick(0.3);
        }
        let detected = monitor.drain_events();
        let first = forced_moves(&detected, ForcedMoveCause::StuckDetected);
        assert_eq!(first.len(), 1);

        // Seven more checks: the next detection is still further out.
        for _ in 0..7 {
            monitor.tick(0.3);
        }
        let events = monitor.drain_events();
        let repeats = forced_moves(&events, ForcedMoveCause::StillStuck);
        assert_eq!(repeats.len(), config.force_move_max_repeats as usize);
        let mut last = first[0];
        for at in &repeats {
            assert!(at - last <= config.force_move_cooldown, "{at} after {last}");
            last = *at;
        }
        assert_eq!(body.command_count(), 1 + repeats.len());

        // Moving away releases the flag; no repeats while moving.
        for i in 1..=12 {
            body.set_position(Vec2::new(i as f32 * 2.0, 0.0));
            monitor.tick(0.3);
            assert!(!monitor.is_stuck());
        }
        assert!(forced_moves(&monitor.drain_events(), ForcedMoveCause::StillStuck).is_empty());
        assert!(monitor.clock() - last >= config.force_move_reset_after);

        // A fresh episode after the quiet period gets the full allowance.
        while !monitor.is_stuck() {
            monitor.tick(0.3);
        }
        monitor.drain_events();
        for _ in 0..7 {
            monitor.tick(0.3);
        }
        let again = forced_moves(&monitor.drain_events(), ForcedMoveCause::StillStuck);
        assert_eq!(again.len(), config.force_move_max_repeats as usize);
    }
}
