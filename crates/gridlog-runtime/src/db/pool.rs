use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::debug;

use gridlog_core::config::DatabaseConfig;
use gridlog_core::error::{GridlogError, Result};

/// Database connection wrapper providing connection pooling.
///
/// Queries check a connection out of the pool for the duration of one call
/// and release it on every exit path; nothing is held across calls.
#[derive(Clone, Debug)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Create a new database connection from configuration.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| {
                GridlogError::Connection(format!(
                    "Failed to connect to {}:{}/{}: {}",
                    config.host, config.port, config.database, e
                ))
            })?;

        debug!(
            host = %config.host,
            database = %config.database,
            pool_size = config.pool_size,
            "database pool created"
        );
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Wrap an existing pool (tests).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| GridlogError::Connection(format!("Connection test failed: {}", e)))?;
        Ok(())
    }

    /// Close all connections gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
