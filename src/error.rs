//! Error types for configuration loading and saving.
//!
//! Binding itself never fails: missing textures, planes and mesh targets are
//! valid states. Only reading and writing config files can go wrong.

use thiserror::Error;

/// Errors that can occur while loading or saving a [`ParticleConfig`](crate::ParticleConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// The config parsed but holds a value the binder cannot use.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
