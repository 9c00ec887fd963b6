//! Process configuration, read from environment variables.
//!
//! | variable                   | default          |
//! |----------------------------|------------------|
//! | `BIND_ADDR`                | `0.0.0.0:8080`   |
//! | `JWT_SECRET`               | insecure dev key |
//! | `USE_PERSISTENT_STORES`    | `false`          |
//! | `DATABASE_URL`             | required if persistent |
//! | `DATABASE_MAX_CONNECTIONS` | `5`              |
//! | `LOG_FORMAT`               | `json`           |

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

use ecom_observability::LogFormat;

pub const DEV_JWT_SECRET: &str = "dev-secret";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which store backend the services run on.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres { url: String, max_connections: u32 },
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => f.write_str("InMemory"),
            Self::Postgres {
                max_connections, ..
            } => f
                .debug_struct("Postgres")
                .field("url", &"<redacted>")
                .field("max_connections", max_connections)
                .finish(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("store", &self.store)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse("BIND_ADDR", get("BIND_ADDR").as_deref().unwrap_or(DEFAULT_BIND_ADDR))?;
        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        let log_format = match get("LOG_FORMAT") {
            Some(raw) => parse("LOG_FORMAT", &raw)?,
            None => LogFormat::default(),
        };

        let persistent = match get("USE_PERSISTENT_STORES") {
            Some(raw) => parse_bool("USE_PERSISTENT_STORES", &raw)?,
            None => false,
        };
        let store = if persistent {
            let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => parse("DATABASE_MAX_CONNECTIONS", &raw)?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            if max_connections == 0 {
                return Err(ConfigError::Invalid {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            StoreConfig::Postgres {
                url,
                max_connections,
            }
        } else {
            StoreConfig::InMemory
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            store,
            log_format,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
