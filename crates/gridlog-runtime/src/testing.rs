//! Explicit database provisioning for tests.
//!
//! Test database configuration is intentionally explicit: pass a URL via
//! [`TestDatabase::from_url`], or opt in to the `TEST_DATABASE_URL`
//! environment variable via [`TestDatabase::from_env`]. The runtime's DB_*
//! variables are never read here, so tests cannot silently land on a
//! production database.

use sqlx::postgres::{PgPool, PgPoolOptions};

use gridlog_core::error::{GridlogError, Result};

/// Explicit database access for integration tests.
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Connect to the database at the given URL.
    pub async fn from_url(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(GridlogError::Sql)?;

        Ok(Self { pool })
    }

    /// Connect using the TEST_DATABASE_URL environment variable.
    pub async fn from_env() -> Result<Self> {
        let url = std::env::var("TEST_DATABASE_URL").map_err(|_| {
            GridlogError::Config(
                "TEST_DATABASE_URL not set. Set it explicitly for database tests.".to_string(),
            )
        })?;
        Self::from_url(&url).await
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run raw SQL to set up schema or test data.
    pub async fn execute(&self, sql: &str) -> Result<()> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(GridlogError::Sql)?;
        Ok(())
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
