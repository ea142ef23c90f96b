/*!
# Configuration

Caller-facing operation defaults, loadable from a TOML file with
environment-variable overrides. The serializer's safety bounds are engine
constants, not configuration: they exist to protect the call, not to be
tuned away.
*/

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_ENV: &str = "FIBER_INSPECTOR_CONFIG";
/// Environment override for the default walk depth.
pub const MAX_DEPTH_ENV: &str = "FIBER_INSPECTOR_MAX_DEPTH";
/// Environment override for the default search result budget.
pub const MAX_RESULTS_ENV: &str = "FIBER_INSPECTOR_MAX_RESULTS";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Default `max_depth` for get_tree.
    pub max_depth: usize,
    /// Default `max_results` for search.
    pub max_results: usize,
    /// Default host-element visibility for get_tree.
    pub include_host_elements: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            max_results: 20,
            include_host_elements: false,
        }
    }
}

impl InspectorConfig {
    /// Loads from the file named by `FIBER_INSPECTOR_CONFIG` (when set),
    /// then applies environment overrides. Load problems fall back to the
    /// defaults with a warning; configuration must never prevent attach.
    pub fn load() -> Self {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path)).unwrap_or_else(|error| {
                warn!(%error, %path, "failed to load config file, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Some(depth) = env_usize(MAX_DEPTH_ENV) {
            config.max_depth = depth;
        }
        if let Some(results) = env_usize(MAX_RESULTS_ENV) {
            config.max_results = results;
        }
        config
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Process-wide configuration, loaded once on first use.
    pub fn global() -> &'static InspectorConfig {
        static GLOBAL: Lazy<InspectorConfig> = Lazy::new(InspectorConfig::load);
        &GLOBAL
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, %raw, "ignoring non-numeric environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_operation_contracts() {
        let config = InspectorConfig::default();
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.max_results, 20);
        assert!(!config.include_host_elements);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: InspectorConfig = toml::from_str("max_depth = 5").unwrap();
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.max_results, 20);
    }
}
