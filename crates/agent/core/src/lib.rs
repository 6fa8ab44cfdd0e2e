//! Decision-making core for autonomous game agents.
//!
//! `agent-core` owns the two per-agent subsystems that sit between the
//! host's perception/stat bookkeeping and its action policy:
//!
//! - [`monitor::BehaviorMonitor`] watches position and action history for
//!   stuck states and repeating loops, scores effectiveness, and produces a
//!   reward penalty plus corrective suggestions.
//! - [`goals::GoalArbiter`] keeps a strategic → tactical → actionable goal
//!   chain, re-derived on a fixed interval from agent state and personality.
//!
//! Both run synchronously inside the host's step loop through an explicit
//! `tick(dt)`. Collaborators are injected through [`env::AgentEnv`]; the only
//! cross-agent access is the read-only [`registry::AgentDirectory`].
pub mod action;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod geometry;
pub mod goals;
pub mod monitor;
pub mod registry;

pub use action::{ActionChannels, ActionRecord, ActionVector};
pub use agent::AgentMind;
pub use config::{CognitionConfig, GoalConfig, MonitorConfig, TraitRange, TraitRanges};
pub use env::{
    AgentDirectory, AgentEnv, CurrencyProvider, ExplorationMemory, InventoryProvider,
    MoodDimension, MovementController, PerceptionProvider, RewardSink, Sighting, SlotView,
    StatsProvider,
};
pub use error::{ConfigError, RegistryError};
pub use geometry::Vec2;
pub use goals::{
    ActionableKind, GOAL_ENCODING_LEN, Goal, GoalArbiter, GoalChain, GoalContext, GoalEncoding,
    GoalKind, GoalTier, PersonalityProfile, ProgressCounters, StrategicKind, TacticalKind,
    TacticalType,
};
pub use monitor::{
    ActionSuggestion, BehaviorMonitor, Classification, FailureContextKey, FailureRecord,
    ForcedMoveCause, MonitorEvent, MonitorReport, PatternKey,
};
pub use registry::{AgentId, AgentRegistry, PeerSnapshot};
