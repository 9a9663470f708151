use std::{net::SocketAddr, str::FromStr};

use chrono::{TimeDelta, Utc};
use thiserror::Error;

use crate::infrastructure::argon2_password_hasher::HashCost;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub listen_addr: SocketAddr,
    /// How long a confirmation code stays valid, in milliseconds
    pub confirmation_code_expiration_ms: i64,
    pub hash_cost: HashCost,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("APP_PORT").unwrap_or_else(|| "8080".to_string());
        let addr = format!("{}:{}", host, port);
        let listen_addr = addr.parse().map_err(|_| ConfigError::Invalid {
            name: "APP_HOST/APP_PORT",
            value: addr.clone(),
        })?;

        let confirmation_code_expiration_ms: i64 =
            parse_or(&lookup, "CONFIRMATION_CODE_EXPIRATION", 3_600_000)?;
        // every registration adds the window to the current time
        let representable = TimeDelta::try_milliseconds(confirmation_code_expiration_ms)
            .and_then(|window| Utc::now().checked_add_signed(window))
            .is_some();
        if confirmation_code_expiration_ms <= 0 || !representable {
            return Err(ConfigError::Invalid {
                name: "CONFIRMATION_CODE_EXPIRATION",
                value: confirmation_code_expiration_ms.to_string(),
            });
        }

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            listen_addr,
            confirmation_code_expiration_ms,
            hash_cost,
        })
    }

    pub fn confirmation_window(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.confirmation_code_expiration_ms)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
