use std::sync::Arc;

use agent_core::env::memory::{InMemoryPerception, PerceptionState, RecordingMovement};
use agent_core::goals::StrategicScores;
use agent_core::monitor::{
    BoundedWindow, PatternFrequencies, StuckDetector, StuckSample, classify,
};
use agent_core::{
    ActionVector, AgentEnv, BehaviorMonitor, GoalContext, GoalConfig, MonitorConfig,
    PatternKey, PersonalityProfile, Sighting, StrategicKind, Vec2,
};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Vec2> {
    (-50.0f32..50.0, -50.0f32..50.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn action() -> impl Strategy<Value = [i32; 5]> {
    prop::array::uniform5(0i32..3)
}

/// Steps that never move or fight.
fn idle_action() -> impl Strategy<Value = ActionVector> {
    (0i32..3, 0i32..3, 0i32..3).prop_map(|(i, it, c)| ActionVector::new(0, i, it, c, 0))
}

proptest! {
    #[test]
    fn window_never_exceeds_capacity(capacity in 1usize..16, pushes in 0usize..64) {
        let mut window = BoundedWindow::new(capacity);
        for i in 0..pushes {
            window.push(i);
            prop_assert!(window.len() <= capacity);
        }
        prop_assert_eq!(window.len(), pushes.min(capacity));
        if pushes > 0 {
            prop_assert_eq!(window.back().copied(), Some(pushes - 1));
        }
    }

    #[test]
    fn stationary_windows_become_stuck(
        count in 2usize..8,
        jitter in prop::collection::vec((0.0f32..0.2, 0.0f32..0.2), 32),
    ) {
        let mut detector = StuckDetector::new(0.5, count);
        // Window fill plus `count` consecutive stationary checks.
        let needed = 2 * count - 1;
        for (i, (dx, dy)) in jitter.iter().take(needed).enumerate() {
            let sample = detector.sample(Vec2::new(*dx, *dy));
            if i + 1 < needed {
                prop_assert!(!detector.is_stuck());
            } else {
                let detected = matches!(sample, StuckSample::Detected { .. });
                prop_assert!(detected);
            }
        }
        prop_assert!(detector.is_stuck());
    }

    #[test]
    fn one_wide_check_resets_the_counter(count in 2usize..8, far in 1.0f32..20.0) {
        let mut detector = StuckDetector::new(0.5, count);
        for _ in 0..(2 * count - 2) {
            detector.sample(Vec2::ZERO);
        }
        detector.sample(Vec2::new(far, 0.0));
        prop_assert_eq!(detector.consecutive(), 0);
        prop_assert!(!detector.is_stuck());
    }

    #[test]
    fn frequency_map_stays_bounded(
        inserts in prop::collection::vec((0i32..60, 1u32..10), 1..200),
    ) {
        let mut map = PatternFrequencies::default();
        for (n, frequency) in inserts {
            let key = PatternKey::new([ActionVector::new(n, 0, 0, 0, 0)]);
            let is_new = map.get(&key) == 0;
            let full = map.len() == PatternFrequencies::CAPACITY;
            let before: Vec<(PatternKey, u32)> =
                map.iter().map(|(k, f)| (k.clone(), f)).collect();
            let min_before = before.iter().map(|(_, f)| *f).min();

            let evicted = map.record(key.clone(), frequency);
            prop_assert!(map.len() <= PatternFrequencies::CAPACITY);

            if is_new && full {
                let victim = evicted.unwrap_or_default();
                let victim_frequency = before
                    .iter()
                    .find(|(k, _)| *k == victim)
                    .map(|(_, f)| *f);
                prop_assert_eq!(victim_frequency, min_before);
                prop_assert_eq!(map.get(&victim), 0);
            } else {
                prop_assert!(evicted.is_none());
            }
            prop_assert_eq!(map.get(&key), frequency);
        }
    }

    #[test]
    fn penalty_is_idempotent(
        actions in prop::collection::vec(action(), 0..60),
        moves in prop::collection::vec(point(), 0..20),
    ) {
        let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
        let config = MonitorConfig { rng_seed: Some(5), ..MonitorConfig::default() };
        let mut monitor = BehaviorMonitor::new(
            config,
            AgentEnv::empty().with_movement(body.clone()),
        );
        for position in moves {
            body.set_position(position);
            monitor.tick(0.3);
        }
        for step in &actions {
            monitor.record_action(step, "prop");
        }

        let first = monitor.behavior_penalty();
        let second = monitor.behavior_penalty();
        prop_assert_eq!(first.to_bits(), second.to_bits());
        prop_assert_eq!(monitor.report().penalty.to_bits(), first.to_bits());
    }

    #[test]
    fn idle_patterns_are_always_counterproductive(
        steps in prop::collection::vec(idle_action(), 1..5),
        positions in prop::collection::vec(point(), 0..8),
        frequency in 0u32..50,
        enemies_nearby in any::<bool>(),
    ) {
        let pattern = PatternKey::new(steps);
        let classification = classify(&pattern, &positions, frequency, enemies_nearby);
        prop_assert!(classification.is_counterproductive());
    }

    #[test]
    fn combat_near_enemies_is_always_productive(
        mut steps in prop::collection::vec(action(), 1..4),
        positions in prop::collection::vec(point(), 0..8),
        frequency in 0u32..50,
    ) {
        steps[0][ActionVector::COMBAT] = 1;
        let pattern = PatternKey::new(steps.into_iter().map(ActionVector));
        let classification = classify(&pattern, &positions, frequency, true);
        prop_assert!(!classification.is_counterproductive());
    }

    #[test]
    fn strategic_selection_is_first_maximum(
        scores in prop::array::uniform4(prop_oneof![Just(0.0f32), Just(0.5f32), 0.0f32..1.0]),
    ) {
        let scores = StrategicScores {
            survival: scores[0],
            resource_accumulation: scores[1],
            social_bonding: scores[2],
            progression: scores[3],
        };
        let (kind, best) = scores.select();

        let max = StrategicKind::all()
            .iter()
            .map(|k| scores.get(*k))
            .fold(f32::MIN, f32::max);
        let first = StrategicKind::all()
            .into_iter()
            .find(|k| scores.get(*k) == max);
        prop_assert_eq!(best, max);
        prop_assert_eq!(Some(kind), first);
    }

    #[test]
    fn encoding_has_one_hot_blocks(
        health in 0.0f32..1.0,
        hunger in 0.0f32..1.0,
        thirst in 0.0f32..1.0,
        gold in prop::option::of(0u32..1_000),
        fullness in prop::option::of(0.0f32..1.0),
        mood in -100.0f32..100.0,
        destination_known in any::<bool>(),
        enemies in 0usize..4,
        npcs in 0usize..3,
        traits in prop::array::uniform5(0.0f32..1.0),
    ) {
        let ctx = GoalContext {
            survival: agent_core::env::SurvivalRatios { health, hunger, thirst },
            gold,
            fullness,
            social_mood: mood,
            destination_known,
            enemies: (0..enemies)
                .map(|i| Sighting::new(Vec2::new(i as f32 * 2.0, 0.0), "enemy"))
                .collect(),
            npc_count: npcs,
            ..GoalContext::default()
        };
        let personality =
            PersonalityProfile::new(traits[0], traits[1], traits[2], traits[3], traits[4]);
        let (chain, _) = agent_core::goals::derive_chain(&ctx, &personality, &GoalConfig::default());
        let encoding = agent_core::goals::encode(
            &chain,
            &agent_core::ProgressCounters::default(),
            &personality,
        );

        prop_assert_eq!(encoding.len(), 17);
        let strategic_hot = encoding[..4].iter().filter(|v| **v == 1.0).count();
        let strategic_zero = encoding[..4].iter().filter(|v| **v == 0.0).count();
        prop_assert_eq!((strategic_hot, strategic_zero), (1, 3));
        let tactical_hot = encoding[4..9].iter().filter(|v| **v == 1.0).count();
        let tactical_zero = encoding[4..9].iter().filter(|v| **v == 0.0).count();
        prop_assert_eq!((tactical_hot, tactical_zero), (1, 4));
        prop_assert_eq!(&encoding[12..], &personality.to_array()[..]);
    }
}

#[test]
fn enemies_seen_by_monitor_keep_combat_loops_productive() {
    let perception = Arc::new(InMemoryPerception::new(PerceptionState {
        enemies: vec![Sighting::new(Vec2::new(1.0, 1.0), "wolf")],
        ..PerceptionState::default()
    }));
    let body = Arc::new(RecordingMovement::anchored(Vec2::ZERO));
    let config = MonitorConfig {
        rng_seed: Some(2),
        ..MonitorConfig::default()
    };
    let mut monitor = BehaviorMonitor::new(
        config,
        AgentEnv::empty().with_perception(perception).with_movement(body.clone()),
    );
    for _ in 0..5 {
        monitor.tick(0.3);
    }
    for step in [[1, 0, 0, 0, 1], [2, 0, 0, 0, 1]].repeat(3) {
        monitor.record_action(&step, "fight");
    }
    assert!(monitor.is_repeating_pattern());
    assert!(
        !monitor
            .classification()
            .is_some_and(|c| c.is_counterproductive())
    );
    // No wall push was forced.
    assert_eq!(body.command_count(), 0);
}
