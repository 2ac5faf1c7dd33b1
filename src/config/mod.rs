//! Listener configuration.
//!
//! The schema is deliberately small: the host only needs an address to bind.
//! Everything else (routes, timeouts, middleware) belongs to the engine.

pub mod loader;

pub use loader::{load_config, ConfigError};

use serde::{Deserialize, Serialize};

/// Default bind host when none is supplied.
pub const DEFAULT_HOST: &str = "localhost";

/// Default bind port when none is supplied.
pub const DEFAULT_PORT: u16 = 3000;

/// Where the listener should bind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Hostname or address to bind (e.g., "localhost", "0.0.0.0").
    pub host: String,

    /// Local port to bind. Port 0 asks the OS for an ephemeral port.
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ListenConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Semantic validation; serde handles the syntactic side.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation("host must not be empty".into()));
        }
        Ok(())
    }
}
