//! Error types for the engine.
//!
//! Lookups never fail: out-of-bounds cells and missing neighbours resolve to empty or
//! to a caller-supplied fallback. What remains are programming errors surfaced as
//! values (double registration) and configuration problems at startup.

use std::path::PathBuf;

use thiserror::Error;

use super::voxels::chunk::ChunkIndex;

/// Errors raised by the world index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("chunk ({}, {}) is already registered", .index.i, .index.j)]
    ChunkAlreadyRegistered { index: ChunkIndex },
}

/// Errors raised while loading or validating an [`EngineConfig`](super::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level error returned by engine construction and the binary driver.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_chunk() {
        let error = WorldError::ChunkAlreadyRegistered {
            index: ChunkIndex::new(-1, 4),
        };
        assert_eq!(error.to_string(), "chunk (-1, 4) is already registered");
    }

    #[test]
    fn config_errors_convert_into_engine_errors() {
        let error: EngineError = ConfigError::Invalid("tasks_per_tick must be positive".into()).into();
        assert!(matches!(error, EngineError::Config(ConfigError::Invalid(_))));
        assert_eq!(
            error.to_string(),
            "invalid config: tasks_per_tick must be positive"
        );
    }
}
