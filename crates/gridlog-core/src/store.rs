use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::model::{LogRecord, StatRecord};

/// Boxed future returned by [`LogStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Read-only access to the log store.
///
/// This is the seam between the pagination logic and PostgreSQL: the
/// runtime crate provides the real implementation, tests script a mock.
///
/// Implementations:
/// - Must not mutate stored data.
/// - Must scope any connection to the single call; nothing is held across
///   calls.
/// - Restrict both queries to the fixed 24-hour recency window.
pub trait LogStore: Send + Sync {
    /// Fetch one page of recent logs, ordered by descending id with ties
    /// broken by descending timestamp, starting at `offset` and returning
    /// at most `limit` records.
    ///
    /// `offset` must be >= 0 and `limit` > 0.
    fn fetch_logs(&self, offset: i64, limit: i64) -> StoreFuture<'_, Vec<LogRecord>>;

    /// Fetch the top apps by log count within the recency window, ordered
    /// by count descending.
    fn fetch_stats(&self) -> StoreFuture<'_, Vec<StatRecord>>;

    /// Connectivity probe for the test-connection diagnostic.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
