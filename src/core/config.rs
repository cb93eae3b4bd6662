//! Runtime configuration for the store and its logging.
//!
//! Loaded from an optional TOML file; a missing file is not an error and
//! yields defaults. Environment variables override whatever the file says.

use crate::core::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "GENBRIDGE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "GENBRIDGE_LOG";

const DEFAULT_DB_PATH: &str = "app.db";
const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file backing the store.
    pub path: PathBuf,
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

impl DatabaseConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `genbridge=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, BridgeError> {
        toml::from_str(content).map_err(|e| BridgeError::ConfigError(e.to_string()))
    }

    /// Load config from `path` if given and present, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, BridgeError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(p).map_err(BridgeError::IoError)?;
                Self::from_toml_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(p) = env::var(DB_PATH_ENV) {
            if !p.trim().is_empty() {
                self.database.path = PathBuf::from(p);
            }
        }
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.logging.level = level;
            }
        }
    }
}
