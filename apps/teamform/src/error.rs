//! # Application Errors

use std::convert::Infallible;
use std::path::PathBuf;
use teamform_core::FormationError;
use thiserror::Error;

/// Errors surfaced by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its record type.
    #[error("Invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Invalid config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override holds an unusable value.
    #[error("Invalid value {value:?} for {key}")]
    Env { key: String, value: String },

    /// An input file exceeds the size limit.
    #[error("File '{}' is {size} bytes, maximum allowed is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// A blocking task was cancelled or panicked.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Formation itself failed.
    #[error(transparent)]
    Formation(#[from] FormationError),
}

impl From<Infallible> for AppError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
