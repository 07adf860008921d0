//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use pawdesk_observability::LogFormat;
use pawdesk_observability::tracing::UnknownLogFormat;
use thiserror::Error;

pub const BIND_VAR: &str = "PAWDESK_BIND";
pub const SESSION_SNAPSHOT_VAR: &str = "PAWDESK_SESSION_SNAPSHOT";
pub const LOG_FORMAT_VAR: &str = "PAWDESK_LOG_FORMAT";

const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PAWDESK_BIND='{value}' is not a socket address: {source}")]
    InvalidBind {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    LogFormat(#[from] UnknownLogFormat),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// File holding stored sessions across restarts; in-memory only when unset.
    pub session_snapshot: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind_raw.clone(),
                source,
            })?;

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind,
            session_snapshot: get(SESSION_SNAPSHOT_VAR).map(PathBuf::from),
            log_format,
        })
    }
}
