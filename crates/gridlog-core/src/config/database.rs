use serde::{Deserialize, Serialize};

use crate::error::{GridlogError, Result};

/// Database connection configuration.
///
/// Individual connection parameters rather than a single URL, matching the
/// environment the monitor is deployed with (DB_HOST, DB, DB_USER,
/// DB_PASSWORD, DB_PORT).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database server host.
    pub host: String,

    /// Database name.
    pub database: String,

    /// Login user.
    pub user: String,

    /// Login password.
    pub password: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Pool checkout timeout in seconds.
    #[serde(default = "default_pool_timeout")]
    pub pool_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Build configuration from the DB_* environment variables.
    ///
    /// DB_PORT is optional and defaults to 5432; every other variable is
    /// required and its absence surfaces as a configuration error.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("DB_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                GridlogError::Config(format!("DB_PORT is not a valid port number: {}", raw))
            })?,
            Err(_) => default_port(),
        };

        Ok(Self {
            host: required_var("DB_HOST")?,
            database: required_var("DB")?,
            user: required_var("DB_USER")?,
            password: required_var("DB_PASSWORD")?,
            port,
            pool_size: default_pool_size(),
            pool_timeout_secs: default_pool_timeout(),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| GridlogError::Config(format!("Missing required environment variable {}", name)))
}

fn default_port() -> u16 {
    5432
}

fn default_pool_size() -> u32 {
    5
}

fn default_pool_timeout() -> u64 {
    30
}
