use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures that abort session construction.
///
/// A session that cannot be set up never falls back to an arbitrary start
/// cell, since that cell could be a wall.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("map {width}x{height} has no traversable cell to start on")]
    NoTraversableCell { width: u16, height: u16 },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
