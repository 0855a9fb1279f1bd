//! Configuration for the store and server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EventKvError, EventKvResult};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
    /// Upper bound on lock waits, in milliseconds. Operations blocked longer
    /// than this fail with a timeout error.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let eventkv_dir = dirs::home_dir()
            .map(|h| h.join(".eventkv"))
            .unwrap_or_else(|| PathBuf::from(".eventkv"));

        Self {
            path: eventkv_dir.join("events.db"),
            busy_timeout_ms: 1_000,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> EventKvResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| EventKvError::Configuration(format!("invalid config file: {}", e)))
    }

    /// Apply `EVENTKV_HOST`, `EVENTKV_PORT`, and `EVENTKV_DB_PATH` overrides
    /// from the environment.
    pub fn apply_env_overrides(mut self) -> EventKvResult<Self> {
        if let Ok(host) = std::env::var("EVENTKV_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("EVENTKV_PORT") {
            self.server.port = port.parse().map_err(|_| {
                EventKvError::Configuration(format!("EVENTKV_PORT is not a valid port: {}", port))
            })?;
        }
        if let Ok(path) = std::env::var("EVENTKV_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        Ok(self)
    }
}
