//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::ListenConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid listen config: {0}")]
    Validation(String),
}

/// Load and validate a listen configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ListenConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<ListenConfig, ConfigError> {
    let config: ListenConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
