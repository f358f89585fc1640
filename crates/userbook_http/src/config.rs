//! Server configuration resolved from the environment.
//!
//! | Variable             | Default                      |
//! |----------------------|------------------------------|
//! | `USERBOOK_DB_PATH`   | `<tmp>/userbook.sqlite3`     |
//! | `USERBOOK_BIND_ADDR` | `127.0.0.1:3000`             |
//! | `USERBOOK_LOG_LEVEL` | `debug` / `info` per build   |
//! | `USERBOOK_LOG_DIR`   | `<tmp>/userbook-logs`        |
//!
//! Blank values fall back to the default.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "USERBOOK_DB_PATH";
pub const BIND_ADDR_VAR: &str = "USERBOOK_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "USERBOOK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "USERBOOK_LOG_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DB_FILE_NAME: &str = "userbook.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "userbook-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr { value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, reason } => {
                write!(f, "invalid {BIND_ADDR_VAR} `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let raw_bind = value(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: raw_bind.clone(),
                reason: err.to_string(),
            })?;

        let db_path = value(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = value(LOG_LEVEL_VAR)
            .unwrap_or_else(|| userbook_core::default_log_level().to_string());
        let log_dir = value(LOG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));

        Ok(Self {
            bind_addr,
            db_path,
            log_level,
            log_dir,
        })
    }
}
