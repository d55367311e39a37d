//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Hold the database path and logging settings in one value.
//! - Read overrides from `APARTMENTS_*` environment variables.
//! - Bootstrap logging and the database connection from that value.

use crate::db::{open_db, DbError};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE: &str = "apartments.db";
pub const ENV_DB_PATH: &str = "APARTMENTS_DB";
pub const ENV_LOG_LEVEL: &str = "APARTMENTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "APARTMENTS_LOG_DIR";

/// Core runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Database file, created on first open.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with any non-empty `APARTMENTS_*` variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());

        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Starts logging (when configured) and opens the migrated database.
    pub fn bootstrap(&self) -> Result<Connection, BootstrapError> {
        if let Some(log_dir) = &self.log_dir {
            init_logging(&self.log_level, log_dir)?;
        }
        Ok(open_db(&self.db_path)?)
    }
}

/// Startup failures from [`CoreConfig::bootstrap`].
#[derive(Debug)]
pub enum BootstrapError {
    Logging(LoggingError),
    Db(DbError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "failed to open database: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<LoggingError> for BootstrapError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for BootstrapError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}
