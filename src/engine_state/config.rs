//! Startup configuration, read from an optional JSON file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::ConfigError;

/// Runtime knobs for the engine. Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// World seed. The same seed always produces the same terrain.
    pub seed: u32,
    /// The initial world is the `(2r + 1)²` chunks around the origin.
    pub initial_radius: i32,
    /// Chunks within this Chebyshev distance of the player are streamed in.
    pub view_distance: i32,
    /// Deferred tasks dispatched per tick.
    pub tasks_per_tick: usize,
    /// Background workers. Zero runs deferred work inline on the main thread.
    pub worker_threads: usize,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: 2024,
            initial_radius: 1,
            view_distance: 2,
            tasks_per_tick: 4,
            worker_threads: 1,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "initial_radius must not be negative (got {})",
                self.initial_radius
            )));
        }
        if self.view_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "view_distance must not be negative (got {})",
                self.view_distance
            )));
        }
        if self.view_distance < self.initial_radius {
            return Err(ConfigError::Invalid(format!(
                "view_distance ({}) must be at least initial_radius ({})",
                self.view_distance, self.initial_radius
            )));
        }
        if self.tasks_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "tasks_per_tick must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.initial_radius, 1);
    }

    #[test]
    fn fields_override_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "seed": 7, "worker_threads": 0, "log_filter": "debug" }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.worker_threads, 0);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.tasks_per_tick, 4);
    }

    #[test]
    fn rejects_bad_values() {
        for text in [
            r#"{ "tasks_per_tick": 0 }"#,
            r#"{ "initial_radius": -1 }"#,
            r#"{ "initial_radius": 3, "view_distance": 2 }"#,
        ] {
            assert!(
                matches!(EngineConfig::from_json_str(text), Err(ConfigError::Invalid(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ seed: }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "sede": 1 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = EngineConfig::load("/nonexistent/voxel-engine.json").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/voxel-engine.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
