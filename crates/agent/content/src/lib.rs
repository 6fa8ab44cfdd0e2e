//! Data-driven cognition content and loaders.
//!
//! This crate provides named personality presets and loaders for the data
//! files hosts ship alongside their agents:
//! - Cognition tunables (data-driven via TOML)
//! - Personality presets by archetype name (data-driven via RON)
//!
//! All loaders produce `agent-core` types directly with serde.

pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use presets::{PresetRegistry, TraitKind, build_ranges_from_pairs};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, load_personality_presets, load_preset_registry};
