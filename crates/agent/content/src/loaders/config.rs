//! Cognition configuration loader.

use std::path::Path;

use agent_core::CognitionConfig;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for cognition tunables from TOML files.
///
/// Every table and key is optional; anything omitted keeps its default.
///
/// ```toml
/// [monitor]
/// stuck_threshold = 0.75
///
/// [goals]
/// goal_update_interval = 1.5
///
/// [personality.curiosity]
/// min = 0.4
/// max = 1.0
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> LoadResult<CognitionConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {}", path.display(), e))?;

        debug!(
            target: "cognition::content",
            path = %path.display(),
            "loaded cognition config"
        );
        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but no path yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> LoadResult<CognitionConfig> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(CognitionConfig::default()),
        }
    }

    /// Parse and validate config TOML held in memory.
    pub fn parse(content: &str) -> LoadResult<CognitionConfig> {
        let config: CognitionConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use agent_core::{ConfigError, MonitorConfig, TraitRange};

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), CognitionConfig::default());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [monitor]
            stuck_threshold = 0.75
            rng_seed = 9

            [personality.curiosity]
            min = 0.4
            max = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.monitor.stuck_threshold, 0.75);
        assert_eq!(config.monitor.rng_seed, Some(9));
        assert_eq!(
            config.monitor.stuck_check_count,
            MonitorConfig::default().stuck_check_count
        );
        assert_eq!(config.personality.curiosity, TraitRange::new(0.4, 1.0));
        assert_eq!(config.goals, CognitionConfig::default().goals);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ConfigLoader::parse(
            r#"
            [goals]
            goal_update_interval = 0.0
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NonPositiveInterval {
                field: "goal_update_interval",
                ..
            })
        ));
    }

    #[test]
    fn malformed_toml_reports_a_parse_error() {
        let err = ConfigLoader::parse("[monitor\nstuck_threshold = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }
}
