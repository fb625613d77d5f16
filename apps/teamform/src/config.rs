//! # Configuration
//!
//! Layered configuration for the binary, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `teamform.toml` in the working directory, or the `--config` path
//! 3. Environment: `TEAMFORM_ADVANCED_THRESHOLD`, `TEAMFORM_DEFAULT_TEAM_SIZE`
//! 4. Command-line flags (applied by the command itself)
//!
//! ```toml
//! [formation]
//! advanced_threshold = 100
//! default_team_size = 5
//!
//! [output]
//! pretty = true
//! ```

use crate::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use teamform_core::FormationConfig;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "teamform.toml";

/// Environment override for the advanced threshold.
pub const ENV_ADVANCED_THRESHOLD: &str = "TEAMFORM_ADVANCED_THRESHOLD";

/// Environment override for the default team size.
pub const ENV_DEFAULT_TEAM_SIZE: &str = "TEAMFORM_DEFAULT_TEAM_SIZE";

/// Output options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print persisted JSON.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Effective configuration of the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Engine parameters.
    pub formation: FormationConfig,
    /// Output options.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|source| AppError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load the file layer, then apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `teamform.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::read_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.formation.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text, path)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ADVANCED_THRESHOLD) {
            self.formation.advanced_threshold = parse_env(ENV_ADVANCED_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_TEAM_SIZE) {
            self.formation.default_team_size = parse_env(ENV_DEFAULT_TEAM_SIZE, &value)?;
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, threshold: Option<u64>, team_size: Option<usize>) {
        if let Some(threshold) = threshold {
            self.formation.advanced_threshold = threshold;
        }
        if let Some(team_size) = team_size {
            self.formation.default_team_size = team_size;
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value.trim().parse().map_err(|_| AppError::Env {
        key: key.to_string(),
        value: value.to_string(),
    })
}
