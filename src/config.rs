//! Runtime configuration for the replay driver.

use crate::games::dots::{RuleConfig, SPLIT_CONNECTIONS};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Top-level configuration file.
///
/// ```toml
/// log_filter = "godotgo=debug"
///
/// [rules]
/// max_connections = 3
/// placement_path = "anchors"
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Default tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Rule constants.
    #[serde(default)]
    rules: RuleConfig,
}

#[instrument]
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            rules: RuleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            max_connections = config.rules.max_connections,
            placement_path = %config.rules.placement_path,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        if rules.max_connections < SPLIT_CONNECTIONS {
            return Err(ConfigError::new(format!(
                "max_connections ({}) must be at least {} so a point can split a line",
                rules.max_connections, SPLIT_CONNECTIONS
            )));
        }
        if rules.min_seeds_to_start > rules.seed_pool_size {
            return Err(ConfigError::new(format!(
                "min_seeds_to_start ({}) exceeds seed_pool_size ({})",
                rules.min_seeds_to_start, rules.seed_pool_size
            )));
        }
        let distances = [
            ("line_tolerance", rules.line_tolerance),
            ("snap_radius", rules.snap_radius),
            ("min_point_distance", rules.min_point_distance),
            ("drag_sample_distance", rules.drag_sample_distance),
        ];
        if let Some((name, value)) = distances
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(ConfigError::new(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dots::PlacementPath;

    #[test]
    fn test_empty_file_is_default() {
        let config = GameConfig::from_toml("").expect("valid");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_partial_rules_section() {
        let config = GameConfig::from_toml(
            r#"
            log_filter = "debug"

            [rules]
            snap_radius = 25.0
            placement_path = "anchors"
            "#,
        )
        .expect("valid");
        assert_eq!(config.rules().snap_radius, 25.0);
        assert_eq!(config.rules().placement_path, PlacementPath::Anchors);
        assert_eq!(config.rules().max_connections, 3);
    }

    #[test]
    fn test_rejects_unreachable_start() {
        let err = GameConfig::from_toml("[rules]\nseed_pool_size = 2\nmin_seeds_to_start = 3\n")
            .expect_err("invalid");
        assert!(err.message.contains("min_seeds_to_start"));
    }

    #[test]
    fn test_rejects_quota_below_split() {
        for max in [0, 1] {
            let err = GameConfig::from_toml(&format!("[rules]\nmax_connections = {}\n", max))
                .expect_err("invalid");
            assert!(err.message.contains("max_connections"));
        }
        assert!(GameConfig::from_toml("[rules]\nmax_connections = 2\n").is_ok());
    }

    #[test]
    fn test_rejects_negative_distance() {
        let err = GameConfig::from_toml("[rules]\nsnap_radius = -1.0\n").expect_err("invalid");
        assert!(err.message.contains("snap_radius"));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = GameConfig::default();
        let text = config.to_toml().expect("renders");
        assert!(text.contains("[rules]"));
        assert_eq!(GameConfig::from_toml(&text).expect("valid"), config);
    }
}
