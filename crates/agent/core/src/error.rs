//! Error types surfaced by configuration and registry lifecycle calls.
//!
//! Per-tick operations never fail: missing collaborators and malformed input
//! degrade to neutral defaults instead. Only setup-time calls return these.

use crate::registry::AgentId;

/// Invalid tunables rejected by [`crate::CognitionConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a positive, finite number of seconds (got {value})")]
    NonPositiveInterval { field: &'static str, value: f32 },

    #[error("{field} must be at least {min} (got {value})")]
    CapacityTooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },

    #[error("pattern length bounds {min}..={max} are invalid (limit {limit})")]
    PatternLengthBounds { min: usize, max: usize, limit: usize },

    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidThreshold { field: &'static str, value: f32 },

    #[error("trait range for {trait_name} is invalid: [{min}, {max}] must lie within [0, 1]")]
    TraitRange {
        trait_name: &'static str,
        min: f32,
        max: f32,
    },
}

/// Lifecycle failures of the process-wide [`crate::AgentRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("agent {0} is already registered")]
    AlreadyRegistered(AgentId),

    #[error("agent {0} is not registered")]
    NotRegistered(AgentId),

    #[error("agent registry lock poisoned")]
    LockPoisoned,
}
