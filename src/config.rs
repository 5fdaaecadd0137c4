//! Service configuration.
//!
//! Settings come from environment variables, optionally layered over a TOML
//! file. Environment values win over file values:
//!
//! - `RENEWAL_DESK_CONFIG` - Optional. Path to a TOML file with the keys below.
//! - `RENEWAL_DESK_BIND` (`bind`) - Listen address. Defaults to `127.0.0.1:8080`.
//! - `DATABASE_URL` (`database_url`) - `PostgreSQL` URL. Absent means the
//!   in-memory store.
//! - `RENEWAL_DESK_DB_POOL_SIZE` (`db_pool_size`) - Defaults to `8`.
//! - `RENEWAL_DESK_AUTOMATION_URL` (`automation_url`) - Executor webhook.
//!   Absent means automation signals are only logged.
//! - `RENEWAL_DESK_AUTOMATION_TIMEOUT_SECS` (`automation_timeout_secs`) -
//!   Defaults to `10`.
//! - `RENEWAL_DESK_LOG` (`log`) - `EnvFilter` directives.
//! - `RENEWAL_DESK_LOG_FORMAT` (`log_format`) - `text` or `json`.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const CONFIG_PATH_VAR: &str = "RENEWAL_DESK_CONFIG";
const BIND_VAR: &str = "RENEWAL_DESK_BIND";
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const POOL_SIZE_VAR: &str = "RENEWAL_DESK_DB_POOL_SIZE";
const AUTOMATION_URL_VAR: &str = "RENEWAL_DESK_AUTOMATION_URL";
const AUTOMATION_TIMEOUT_VAR: &str = "RENEWAL_DESK_AUTOMATION_TIMEOUT_SECS";
const LOG_VAR: &str = "RENEWAL_DESK_LOG";
const LOG_FORMAT_VAR: &str = "RENEWAL_DESK_LOG_FORMAT";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_AUTOMATION_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILTER: &str = "renewal_desk=info,tower_http=info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this service.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: Box<toml::de::Error>,
    },

    /// A setting has an unusable value.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other}")),
        }
    }
}

/// Keys accepted in the TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind: Option<String>,
    database_url: Option<String>,
    db_pool_size: Option<u32>,
    automation_url: Option<String>,
    automation_timeout_secs: Option<u64>,
    log: Option<String>,
    log_format: Option<LogFormat>,
}

/// Resolved service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// `PostgreSQL` connection URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: u32,
    /// Executor webhook; `None` selects the logging trigger.
    pub automation_url: Option<String>,
    /// Request timeout for executor calls.
    pub automation_timeout: Duration,
    /// `EnvFilter` directives.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be loaded or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which stands in for the
    /// environment. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be loaded or a value is
    /// invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let file = match var(CONFIG_PATH_VAR) {
            Some(path) => load_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let bind_text = var(BIND_VAR)
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = parse_value(BIND_VAR, &bind_text)?;

        let db_pool_size = match var(POOL_SIZE_VAR) {
            Some(text) => parse_value(POOL_SIZE_VAR, &text)?,
            None => file.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE),
        };
        if db_pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: POOL_SIZE_VAR,
                value: db_pool_size.to_string(),
                reason: "pool size must be at least 1".to_owned(),
            });
        }

        let timeout_secs = match var(AUTOMATION_TIMEOUT_VAR) {
            Some(text) => parse_value(AUTOMATION_TIMEOUT_VAR, &text)?,
            None => file
                .automation_timeout_secs
                .unwrap_or(DEFAULT_AUTOMATION_TIMEOUT_SECS),
        };

        let log_format = match var(LOG_FORMAT_VAR) {
            Some(text) => {
                text.parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: LOG_FORMAT_VAR,
                        value: text.clone(),
                        reason,
                    })?
            }
            None => file.log_format.unwrap_or_default(),
        };

        Ok(Self {
            bind,
            database_url: var(DATABASE_URL_VAR).or(file.database_url),
            db_pool_size,
            automation_url: var(AUTOMATION_URL_VAR).or(file.automation_url),
            automation_timeout: Duration::from_secs(timeout_secs),
            log_filter: var(LOG_VAR)
                .or(file.log)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
            log_format,
        })
    }
}

fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn parse_value<T>(key: &'static str, text: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse().map_err(|err: T::Err| ConfigError::InvalidValue {
        key,
        value: text.to_owned(),
        reason: err.to_string(),
    })
}
