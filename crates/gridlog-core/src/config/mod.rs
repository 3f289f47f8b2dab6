mod database;

pub use database::DatabaseConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GridlogError, Result};

/// Root configuration for gridlog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridlogConfig {
    /// Database connection parameters.
    pub database: DatabaseConfig,

    /// Monitor behavior configuration.
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl GridlogConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GridlogError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// `${VAR_NAME}` placeholders are substituted from the process
    /// environment before parsing.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let substituted = substitute_env_vars(content);

        toml::from_str(&substituted)
            .map_err(|e| GridlogError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Build configuration entirely from environment variables.
    ///
    /// Used when no config file is present; reads the DB_* variables the
    /// monitor has always been configured with. A missing required variable
    /// is a configuration error, never a panic.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            monitor: MonitorConfig::default(),
        })
    }
}

/// Monitor behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Logs fetched per page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Per-query timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

fn default_page_size() -> i64 {
    100
}

fn default_query_timeout() -> u64 {
    10
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_monitor_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.query_timeout_secs, 10);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
            [database]
            host = "localhost"
            database = "telemetry"
            user = "monitor"
            password = "secret"
        "#;

        let config = GridlogConfig::parse_toml(toml).unwrap();
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.monitor.page_size, 100);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [database]
            host = "db.internal"
            database = "telemetry"
            user = "monitor"
            password = "secret"
            port = 5433
            pool_size = 8

            [monitor]
            page_size = 50
            query_timeout_secs = 3
        "#;

        let config = GridlogConfig::parse_toml(toml).unwrap();
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.monitor.page_size, 50);
        assert_eq!(config.monitor.query_timeout_secs, 3);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GRIDLOG_TEST_SUBST_PW", "hunter2");

        let toml = r#"
            [database]
            host = "localhost"
            database = "telemetry"
            user = "monitor"
            password = "${GRIDLOG_TEST_SUBST_PW}"
        "#;

        let config = GridlogConfig::parse_toml(toml).unwrap();
        assert_eq!(config.database.password, "hunter2");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let err = GridlogConfig::from_file("/nonexistent/gridlog.toml").unwrap_err();
        assert!(matches!(err, GridlogError::Config(_)));
    }
}
