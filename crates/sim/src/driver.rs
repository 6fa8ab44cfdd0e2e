//! Fixed-step simulation loop.
//!
//! Each step, every agent in turn: senses the arena, ticks its mind, acts
//! through the scripted policy, feeds the action back to its monitor, pays
//! its survival upkeep, and publishes itself to the registry.

use std::sync::Arc;

use agent_content::PresetRegistry;
use agent_core::env::MovementController;
use agent_core::env::memory::{
    InMemoryExploration, InMemoryInventory, InMemoryPerception, InMemoryStats, InMemoryWallet,
    InventoryState, PerceptionState, RecordingRewards,
};
use agent_core::{
    ActionVector, AgentDirectory, AgentEnv, AgentId, AgentMind, AgentRegistry, CognitionConfig,
    GoalChain, GoalConfig, MonitorEvent, MonitorReport, ProgressCounters, Vec2,
};
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::policy::{self, INTERACT_RANGE, ITEM_PICK_UP, ITEM_USE, Observation, PICKUP_RANGE};
use crate::world::{ArenaBody, NpcRole, VisitedCells, World, WorldSettings};

const BODY_SPEED: f32 = 0.5;
const INVENTORY_SLOTS: usize = 6;
const STARTING_GOLD: u32 = 30;

const HUNGER_DECAY: f32 = 1.5;
const THIRST_DECAY: f32 = 2.0;
const LONELINESS_DRIFT: f32 = 1.0;
const STARVATION_DPS: f32 = 4.0;
const ENEMY_REACH: f32 = 1.5;
const ENEMY_DPS: f32 = 6.0;
const ATTACK_DPS: f32 = 20.0;

const KILL_BOUNTY: u32 = 25;
const KILL_REWARD: f32 = 1.0;
const LOOT_VALUE: u32 = 8;
const ITEM_HEAL: f32 = 30.0;
const WELL_WATER: f32 = 15.0;
const CHAT_MOOD: f32 = 10.0;

/// Run parameters supplied by the binary.
#[derive(Clone, Debug)]
pub struct SimSettings {
    pub agents: usize,
    pub dt: f32,
    pub seed: u64,
    pub world: WorldSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            agents: 4,
            dt: 0.1,
            seed: 0,
            world: WorldSettings::default(),
        }
    }
}

/// Per-agent counters accumulated over the run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tally {
    pub total_reward: f32,
    pub goal_changes: u32,
    pub stuck_events: u32,
    pub loop_breaks: u32,
    pub forced_moves: u32,
    pub patterns_detected: u32,
    pub kills: u32,
    pub loot_collected: u32,
    pub items_used: u32,
    pub deaths: u32,
}

impl Tally {
    fn absorb(&mut self, events: Vec<MonitorEvent>) {
        for event in events {
            match event {
                MonitorEvent::StuckDetected { .. } => self.stuck_events += 1,
                MonitorEvent::LoopBroken { .. } => self.loop_breaks += 1,
                MonitorEvent::ForcedMove { .. } => self.forced_moves += 1,
                MonitorEvent::PatternDetected { .. } => self.patterns_detected += 1,
            }
        }
    }
}

/// End-of-run snapshot of one agent.
#[derive(Clone, Debug, Serialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub preset: String,
    pub personality: [f32; 5],
    pub position: Vec2,
    pub health: f32,
    pub gold: u32,
    pub goals: GoalChain,
    pub progress: ProgressCounters,
    pub monitor: MonitorReport,
    pub tally: Tally,
}

/// One simulated agent with the collaborators backing its environment.
struct SimAgent {
    preset: String,
    mind: AgentMind,
    body: Arc<ArenaBody>,
    stats: Arc<InMemoryStats>,
    perception: Arc<InMemoryPerception>,
    inventory: Arc<InMemoryInventory>,
    wallet: Arc<InMemoryWallet>,
    exploration: Arc<InMemoryExploration>,
    rewards: Arc<RecordingRewards>,
    visited: VisitedCells,
    tally: Tally,
}

pub struct Simulation {
    goals: GoalConfig,
    registry: Arc<AgentRegistry>,
    world: World,
    agents: Vec<SimAgent>,
    rng: StdRng,
    dt: f32,
    open_cells: usize,
    elapsed: f32,
}

impl Simulation {
    pub fn new(
        config: &CognitionConfig,
        presets: &PresetRegistry,
        settings: SimSettings,
    ) -> Result<Self> {
        config.validate()?;
        if !settings.dt.is_finite() || settings.dt <= 0.0 {
            anyhow::bail!("time step must be positive (got {})", settings.dt);
        }

        let mut rng = StdRng::seed_from_u64(settings.seed);
        let world = World::generate(settings.world.clone(), &mut rng);
        let registry = Arc::new(AgentRegistry::new());
        let names = presets.names();

        let mut agents = Vec::with_capacity(settings.agents);
        for index in 0..settings.agents {
            let id = AgentId(index as u32 + 1);
            let preset = names
                .get(index % names.len().max(1))
                .map_or("default", |n| *n)
                .to_string();
            let position = world.layout.random_open_point(&mut rng);
            registry.register(id, position)?;

            let mut agent_config = config.clone();
            if agent_config.monitor.rng_seed.is_none() {
                agent_config.monitor.rng_seed = Some(settings.seed.wrapping_add(u64::from(id.0)));
            }

            let body = Arc::new(ArenaBody::new(world.layout.clone(), position, BODY_SPEED));
            let stats = Arc::new(InMemoryStats::default());
            let perception = Arc::new(InMemoryPerception::default());
            let inventory = Arc::new(InMemoryInventory::new(InventoryState::with_slots(
                INVENTORY_SLOTS,
            )));
            let wallet = Arc::new(InMemoryWallet::new(STARTING_GOLD));
            let exploration = Arc::new(InMemoryExploration::new(false, 0.0));
            let rewards = Arc::new(RecordingRewards::new());

            let env = AgentEnv::empty()
                .with_stats(stats.clone())
                .with_perception(perception.clone())
                .with_inventory(inventory.clone())
                .with_currency(wallet.clone())
                .with_exploration(exploration.clone())
                .with_movement(body.clone())
                .with_rewards(rewards.clone())
                .with_directory(registry.clone());

            let personality = presets.roll(&preset, &mut rng);
            let mind = AgentMind::new(id, &agent_config, personality, env);
            mind.publish(&registry)?;

            info!(
                target: "sim",
                agent = %id,
                preset = %preset,
                x = position.x,
                y = position.y,
                "spawned agent"
            );

            agents.push(SimAgent {
                preset,
                mind,
                body,
                stats,
                perception,
                inventory,
                wallet,
                exploration,
                rewards,
                visited: VisitedCells::default(),
                tally: Tally::default(),
            });
        }

        let open_cells = world.layout.open_cells().max(1);
        Ok(Self {
            goals: config.goals.clone(),
            registry,
            world,
            agents,
            rng,
            dt: settings.dt,
            open_cells,
            elapsed: 0.0,
        })
    }

    pub fn run(&mut self, steps: usize) -> Result<()> {
        for step in 0..steps {
            self.step()?;
            if step % 100 == 99 {
                debug!(target: "sim", step = step + 1, elapsed = self.elapsed, "progress");
            }
        }
        Ok(())
    }

    pub fn step(&mut self) -> Result<()> {
        let dt = self.dt;
        for agent in &mut self.agents {
            sense(agent, &self.world, self.open_cells);

            if agent.mind.tick(dt) {
                agent.tally.goal_changes += 1;
            }
            agent.tally.absorb(agent.mind.monitor_mut().drain_events());

            let obs = Observation {
                position: agent.body.position(),
                strategic: agent.mind.arbiter().strategic().kind,
                actionable: agent.mind.arbiter().actionable().kind,
                suggestion: agent.mind.monitor().action_suggestion(),
                destination_known: agent.mind.env().destination_known(),
                attack_range: self.goals.attack_range,
                world: &self.world,
                visited: &agent.visited,
            };
            let context = obs.actionable.to_string();
            let action = policy::decide(&obs, &mut self.rng);

            act(agent, action, &mut self.world, &self.registry, &self.goals, dt, &mut self.rng);
            agent.mind.record(action, &context);
            agent.tally.absorb(agent.mind.monitor_mut().drain_events());

            upkeep(agent, &self.world, dt, &mut self.rng);
            agent.mind.publish(&self.registry)?;

            let penalty = agent.mind.monitor().behavior_penalty();
            let earned: f32 = agent.rewards.drain().iter().sum();
            agent.tally.total_reward += earned + penalty * dt;
        }

        self.world.restock(&mut self.rng);
        self.elapsed += dt;
        Ok(())
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn summaries(&self) -> Vec<AgentSummary> {
        self.agents
            .iter()
            .map(|agent| AgentSummary {
                id: agent.mind.id(),
                preset: agent.preset.clone(),
                personality: agent.mind.arbiter().personality().to_array(),
                position: agent.body.position(),
                health: agent.stats.snapshot().health,
                gold: agent.mind.env().gold(),
                goals: agent.mind.arbiter().goal_chain(),
                progress: agent.mind.arbiter().progress(),
                monitor: agent.mind.monitor().report(),
                tally: agent.tally.clone(),
            })
            .collect()
    }
}

/// Refreshes what the agent can see and where it has been.
fn sense(agent: &mut SimAgent, world: &World, open_cells: usize) {
    let here = agent.body.position();
    agent.perception.update(|state| {
        *state = PerceptionState {
            enemies: world.enemies_near(here),
            items: world.loot_near(here),
            npcs: world.npcs_near(here),
        }
    });

    agent.visited.visit(world.layout.cell_of(here));
    agent
        .exploration
        .set_progress(agent.visited.len() as f32 / open_cells as f32);
    if world.portal_visible(here) && !agent.mind.env().destination_known() {
        agent.exploration.set_destination_known(true);
        info!(target: "sim", agent = %agent.mind.id(), "found the portal");
    }
}

fn act(
    agent: &mut SimAgent,
    action: ActionVector,
    world: &mut World,
    registry: &AgentRegistry,
    goals: &GoalConfig,
    dt: f32,
    rng: &mut StdRng,
) {
    if let Some(direction) = policy::decode_direction(action.movement()) {
        agent.body.apply_move(direction);
    }
    let here = agent.body.position();

    if action.combat() != 0 {
        if let Some(index) = world.enemy_within(here, goals.attack_range) {
            let weapon = agent.inventory.update(|inv| inv.weapon_damage);
            if world.strike(index, (ATTACK_DPS + weapon) * dt, rng) {
                agent.wallet.deposit(KILL_BOUNTY);
                agent.mind.env().reward(KILL_REWARD);
                agent.tally.kills += 1;
            }
        }
    }

    match action.0[ActionVector::ITEM] {
        ITEM_PICK_UP => {
            if world.take_loot(here, PICKUP_RANGE).is_some() {
                agent.tally.loot_collected += 1;
                if !agent.inventory.update(|inv| inv.add_to_free_slot(1)) {
                    agent.wallet.deposit(LOOT_VALUE);
                }
            }
        }
        ITEM_USE => {
            if agent.inventory.update(|inv| inv.take_one()) {
                agent.tally.items_used += 1;
                agent.stats.update(|s| {
                    s.health = (s.health + ITEM_HEAL).min(s.max_health);
                    s.hunger = (s.hunger + ITEM_HEAL * 0.5).min(s.max_hunger);
                });
            }
        }
        _ => {}
    }

    if action.0[ActionVector::INTERACT] != 0 {
        if let Some(npc) = world.npc_within(here, INTERACT_RANGE) {
            trade(agent, npc.role, goals);
        }
    }

    if action.0[ActionVector::COMMUNICATE] != 0 {
        let near_peer = registry
            .peers(agent.mind.id())
            .iter()
            .any(|p| p.position.distance(here) <= goals.contact_range);
        if near_peer {
            agent
                .stats
                .update(|s| s.social_mood = (s.social_mood + CHAT_MOOD * dt).min(100.0));
        }
    }
}

fn trade(agent: &SimAgent, role: NpcRole, goals: &GoalConfig) {
    match role {
        NpcRole::Healer => {
            if agent.wallet.spend(goals.heal_cost) {
                agent.stats.update(|s| s.health = s.max_health);
            }
        }
        NpcRole::Merchant => {
            if agent.wallet.spend(goals.food_cost) {
                agent.stats.update(|s| {
                    s.hunger = s.max_hunger;
                    s.thirst = s.max_thirst;
                });
            } else if agent.inventory.update(|inv| inv.take_one()) {
                agent.wallet.deposit(LOOT_VALUE);
            }
        }
        NpcRole::Villager => {
            agent.stats.update(|s| {
                s.thirst = (s.thirst + WELL_WATER).min(s.max_thirst);
                s.social_mood = (s.social_mood + CHAT_MOOD).min(100.0);
            });
        }
    }
}

/// Hunger, thirst, loneliness and enemy damage. A dead agent respawns.
fn upkeep(agent: &mut SimAgent, world: &World, dt: f32, rng: &mut StdRng) {
    let here = agent.body.position();
    let attackers = world
        .enemies
        .iter()
        .filter(|e| e.position.distance(here) <= ENEMY_REACH)
        .count() as f32;

    let mut died = false;
    agent.stats.update(|s| {
        s.hunger = (s.hunger - HUNGER_DECAY * dt).max(0.0);
        s.thirst = (s.thirst - THIRST_DECAY * dt).max(0.0);
        s.social_mood = (s.social_mood - LONELINESS_DRIFT * dt).max(-100.0);

        let mut damage = attackers * ENEMY_DPS * dt;
        if s.hunger <= 0.0 || s.thirst <= 0.0 {
            damage += STARVATION_DPS * dt;
        }
        s.health -= damage;

        if s.health <= 0.0 {
            died = true;
            s.health = s.max_health;
            s.hunger = s.max_hunger;
            s.thirst = s.max_thirst;
        }
    });

    if died {
        agent.tally.deaths += 1;
        agent.body.teleport(world.layout.random_open_point(rng));
        info!(target: "sim", agent = %agent.mind.id(), "agent died and respawned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_run(seed: u64) -> Simulation {
        let settings = SimSettings {
            agents: 3,
            seed,
            ..SimSettings::default()
        };
        let mut sim =
            Simulation::new(&CognitionConfig::default(), &PresetRegistry::new(), settings).unwrap();
        sim.run(200).unwrap();
        sim
    }

    #[test]
    fn runs_are_reproducible_for_a_seed() {
        let a = small_run(42).summaries();
        let b = small_run(42).summaries();

        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.tally, y.tally);
            assert_eq!(x.goals, y.goals);
        }
    }

    #[test]
    fn time_advances_by_the_step() {
        let sim = small_run(1);
        assert!((sim.elapsed() - 20.0).abs() < 1e-2);
        for summary in sim.summaries() {
            assert!(summary.health > 0.0);
            assert!(summary.progress.actionable >= 0.0 && summary.progress.actionable < 1.0);
        }
    }

    #[test]
    fn agents_are_visible_to_each_other() {
        let sim = small_run(7);
        assert_eq!(sim.registry.len(), 3);
        let peers = sim.registry.peers(AgentId(1));
        assert_eq!(peers.len(), 2);
        assert!(peers.iter().all(|p| p.strategic.is_some()));
    }

    #[test]
    fn rejects_a_non_positive_step() {
        let settings = SimSettings {
            dt: 0.0,
            ..SimSettings::default()
        };
        assert!(
            Simulation::new(&CognitionConfig::default(), &PresetRegistry::new(), settings)
                .is_err()
        );
    }
}
