//! Runtime configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::pool::DbConfig;

/// Default tracing filter when `ARQUEO_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,arqueo=debug,sqlx=warn";

/// Arqueo backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArqueoConfig {
    /// SQLite database file (`ARQUEO_DB_PATH`)
    pub database_path: PathBuf,

    /// Pool size (`ARQUEO_DB_MAX_CONNECTIONS`, default: 5)
    pub max_connections: u32,

    /// tracing-subscriber EnvFilter directive (`ARQUEO_LOG`)
    pub log_filter: String,
}

impl ArqueoConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (env, file, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("ARQUEO_DB_PATH").unwrap_or_else(|| "./arqueo.db".to_string());
        if database_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("ARQUEO_DB_PATH".to_string()));
        }

        let max_connections: u32 = lookup("ARQUEO_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ARQUEO_DB_MAX_CONNECTIONS".to_string()))?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("ARQUEO_DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(ArqueoConfig {
            database_path: PathBuf::from(database_path),
            max_connections,
            log_filter: lookup("ARQUEO_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Pool configuration for this deployment.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
