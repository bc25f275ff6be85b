//! Runtime configuration for catalog hosts.
//!
//! Values come from serde (when embedded in a host config file) or from
//! `CATALOG_*` environment variables. Blank variables count as unset.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATALOG_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite file. `None` selects a private in-memory store.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging disabled.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Reads `CATALOG_DB_PATH`, `CATALOG_LOG_LEVEL` and `CATALOG_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Builds a config from key/value pairs, ignoring unrelated keys.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                ENV_DB_PATH => config.db_path = Some(PathBuf::from(value)),
                ENV_LOG_LEVEL => config.log_level = value.to_string(),
                ENV_LOG_DIR => config.log_dir = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        config
    }

    /// Opens the configured store, migrated and ready for DAO use.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }

    /// Starts file logging when `log_dir` is set. Returns whether logging runs.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => {
                init_logging(&self.log_level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
