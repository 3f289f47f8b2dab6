pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod monitor;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{DatabaseConfig, GridlogConfig, MonitorConfig};
pub use error::{GridlogError, Result};
pub use executor::{Executor, FetchFailure, FetchFailureKind, FetchOutcome};
pub use model::{AccumulatedView, LogRecord, PaginationCursor, StatRecord, StatView};
pub use monitor::{CommandOutcome, LogMonitor, Phase};
pub use store::{LogStore, StoreFuture};
