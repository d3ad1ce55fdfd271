//! Configuration
//!
//! Optional JSON5 configuration for the `ballot` binary. Poll behavior itself
//! is configured per poll through setting tokens, not here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::logging::LoggingConfig;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parse configuration from JSON5 text
pub fn parse_config(raw: &str) -> Result<BallotConfig, ConfigError> {
    json5::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load configuration from a file, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<BallotConfig, ConfigError> {
    match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?),
        None => Ok(BallotConfig::default()),
    }
}
