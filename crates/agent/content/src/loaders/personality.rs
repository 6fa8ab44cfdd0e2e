//! Personality preset loader.
//!
//! Loads named trait roll ranges from RON files into a [`PresetRegistry`].

use std::collections::HashMap;
use std::path::Path;

use agent_core::TraitRanges;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};
use crate::presets::{PresetRegistry, TraitKind, build_ranges_from_pairs};

/// Loads a personality preset file.
///
/// File format: `HashMap<String, Vec<(TraitKind, f32, f32)>>`, one
/// `(trait, min, max)` triple per trait that deviates from the default
/// range.
///
/// Example:
/// ```ron
/// {
///     "scout": [(Curiosity, 0.8, 1.0), (Caution, 0.1, 0.4)],
///     "merchant": [(Sociability, 0.6, 0.9), (Aggression, 0.0, 0.2)],
/// }
/// ```
pub fn load_personality_presets(path: &Path) -> LoadResult<HashMap<String, TraitRanges>> {
    let content = read_file(path)?;

    let raw_data: HashMap<String, Vec<(TraitKind, f32, f32)>> = ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse personality RON at {:?}: {}", path, e))?;

    let mut result = HashMap::with_capacity(raw_data.len());
    for (name, entries) in raw_data {
        let ranges = build_ranges_from_pairs(&entries);
        ranges
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid personality preset {:?}: {}", name, e))?;
        result.insert(name, ranges);
    }

    debug!(
        target: "cognition::content",
        path = %path.display(),
        presets = result.len(),
        "loaded personality presets"
    );
    Ok(result)
}

/// Loads a preset file into a registry that falls back to `fallback`.
pub fn load_preset_registry(path: &Path, fallback: TraitRanges) -> LoadResult<PresetRegistry> {
    let mut registry = PresetRegistry::with_fallback(fallback);
    for (name, ranges) in load_personality_presets(path)? {
        registry.add_preset(name, ranges);
    }
    Ok(registry)
}
