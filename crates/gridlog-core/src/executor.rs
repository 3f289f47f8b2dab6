//! The query-executor failure boundary.
//!
//! Every store error is caught here and converted into "empty result plus
//! recorded failure reason". The pagination logic above this boundary never
//! sees a raw transport error; it observes empty-vs-nonempty and,
//! separately, the failure channel.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::GridlogError;
use crate::model::{LogRecord, StatRecord};
use crate::store::LogStore;

/// Classification of a recorded fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// Could not reach or authenticate with the store.
    Connection,
    /// The store was reachable but the query failed.
    Query,
    /// The query exceeded its deadline.
    Timeout,
}

/// A failure recorded by the executor in place of a raised error.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl FetchFailure {
    fn from_error(err: &GridlogError) -> Self {
        let kind = match err {
            GridlogError::Timeout(_) => FetchFailureKind::Timeout,
            GridlogError::Config(_) | GridlogError::Connection(_) | GridlogError::Io(_) => {
                FetchFailureKind::Connection
            }
            GridlogError::Sql(e)
                if matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                ) =>
            {
                FetchFailureKind::Connection
            }
            _ => FetchFailureKind::Query,
        };

        Self {
            kind,
            message: err.to_string(),
            at: Utc::now(),
        }
    }
}

/// Outcome of one executor call: the fetched records (empty on failure) and
/// the separately-observable failure channel.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub records: Vec<T>,
    pub failure: Option<FetchFailure>,
}

impl<T> FetchOutcome<T> {
    fn ok(records: Vec<T>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    fn failed(failure: FetchFailure) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(failure),
        }
    }
}

/// Issues the two read-only queries against a [`LogStore`] and absorbs
/// their failures.
pub struct Executor<S> {
    store: S,
}

impl<S: LogStore> Executor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch one page of logs. On any failure the page is empty and the
    /// reason is recorded, never raised.
    pub async fn logs(&self, offset: i64, limit: i64) -> FetchOutcome<LogRecord> {
        match self.store.fetch_logs(offset, limit).await {
            Ok(records) => FetchOutcome::ok(records),
            Err(err) => {
                warn!(error = %err, offset, limit, "log fetch failed");
                FetchOutcome::failed(FetchFailure::from_error(&err))
            }
        }
    }

    /// Fetch the per-app stat rollup. Same failure policy as [`logs`].
    ///
    /// [`logs`]: Executor::logs
    pub async fn stats(&self) -> FetchOutcome<StatRecord> {
        match self.store.fetch_stats().await {
            Ok(records) => FetchOutcome::ok(records),
            Err(err) => {
                warn!(error = %err, "stat fetch failed");
                FetchOutcome::failed(FetchFailure::from_error(&err))
            }
        }
    }

    /// Connectivity probe. Unlike the fetches this returns the error so the
    /// test-connection diagnostic can surface its message.
    pub async fn ping(&self) -> crate::error::Result<()> {
        self.store.ping().await
    }
}
