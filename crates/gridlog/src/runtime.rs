//! Wiring between configuration and a live monitor.

use std::path::Path;

use tracing::info;

use gridlog_core::{GridlogConfig, LogMonitor, Result};
use gridlog_runtime::{Database, PgLogStore};

/// Load configuration from the given TOML file, falling back to the DB_*
/// environment variables when the file does not exist.
pub fn load_config(path: &str) -> Result<GridlogConfig> {
    if Path::new(path).exists() {
        GridlogConfig::from_file(path)
    } else {
        GridlogConfig::from_env()
    }
}

/// Connect to PostgreSQL and build a monitor over it.
pub async fn build_monitor(config: &GridlogConfig) -> Result<LogMonitor<PgLogStore>> {
    let db = Database::from_config(&config.database).await?;
    info!(
        host = %config.database.host,
        database = %config.database.database,
        "connected"
    );
    let store = PgLogStore::from_config(db, &config.monitor);
    LogMonitor::new(store, config.monitor.page_size)
}
