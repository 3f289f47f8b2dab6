//! Test doubles for the log store.
//!
//! [`MockLogStore`] is scripted: push outcomes (pages, stat sets, errors)
//! in the order the code under test will consume them, then verify the
//! recorded calls. An exhausted script answers like an exhausted store —
//! empty pages, empty stats, successful pings.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{GridlogError, Result};
use crate::model::{LogRecord, StatRecord};
use crate::store::{LogStore, StoreFuture};

/// A call recorded by [`MockLogStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Logs { offset: i64, limit: i64 },
    Stats,
    Ping,
}

/// Scriptable in-memory [`LogStore`].
#[derive(Default)]
pub struct MockLogStore {
    logs: Mutex<VecDeque<Result<Vec<LogRecord>>>>,
    stats: Mutex<VecDeque<Result<Vec<StatRecord>>>>,
    pings: Mutex<VecDeque<Result<()>>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MockLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `fetch_logs` outcome.
    pub fn push_logs(&self, records: Vec<LogRecord>) {
        self.logs.lock().unwrap().push_back(Ok(records));
    }

    /// Script the next `fetch_logs` call to fail.
    pub fn push_logs_error(&self, err: GridlogError) {
        self.logs.lock().unwrap().push_back(Err(err));
    }

    /// Script the next `fetch_stats` outcome.
    pub fn push_stats(&self, records: Vec<StatRecord>) {
        self.stats.lock().unwrap().push_back(Ok(records));
    }

    /// Script the next `fetch_stats` call to fail.
    pub fn push_stats_error(&self, err: GridlogError) {
        self.stats.lock().unwrap().push_back(Err(err));
    }

    /// Script the next `ping` call to fail (pings succeed by default).
    pub fn push_ping_error(&self, err: GridlogError) {
        self.pings.lock().unwrap().push_back(Err(err));
    }

    /// Every call made against this store, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl LogStore for MockLogStore {
    fn fetch_logs(&self, offset: i64, limit: i64) -> StoreFuture<'_, Vec<LogRecord>> {
        self.record(StoreCall::Logs { offset, limit });
        let outcome = self
            .logs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));
        Box::pin(async move { outcome })
    }

    fn fetch_stats(&self) -> StoreFuture<'_, Vec<StatRecord>> {
        self.record(StoreCall::Stats);
        let outcome = self
            .stats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));
        Box::pin(async move { outcome })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        self.record(StoreCall::Ping);
        let outcome = self
            .pings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(()));
        Box::pin(async move { outcome })
    }
}

/// Build a log record with the given id and app; the other fields carry
/// plausible fixed values.
pub fn log_record(id: i64, app: &str) -> LogRecord {
    LogRecord {
        id,
        app: app.to_string(),
        client_id: Some(format!("client-{}", id % 7)),
        substation: Some("SS-12".to_string()),
        feeder: Some("F-3".to_string()),
        timestamp: "2026-08-23 10:00:00".to_string(),
        metadata: None,
    }
}

/// Build a page of `count` records with ids descending from `first_id`.
pub fn log_page(first_id: i64, count: usize, app: &str) -> Vec<LogRecord> {
    (0..count as i64)
        .map(|i| log_record(first_id - i, app))
        .collect()
}

/// Build a stat record.
pub fn stat_record(app: &str, count: i64) -> StatRecord {
    StatRecord {
        app: app.to_string(),
        count,
    }
}
