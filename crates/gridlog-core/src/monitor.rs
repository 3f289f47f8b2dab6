//! The pagination state machine and refresh controller.
//!
//! A [`LogMonitor`] owns one pagination state: the cursor, the accumulated
//! log view for the current refresh epoch, the stat rollup, and the failure
//! channel. The host drives it with commands (`refresh`, `load_more`,
//! `ensure_loaded`, `test_connection`) and reads the views back; no
//! rendering concept appears here.

use tracing::{debug, info, warn};

use crate::error::{GridlogError, Result};
use crate::executor::{Executor, FetchFailure};
use crate::model::{AccumulatedView, LogRecord, PaginationCursor, StatRecord, StatView};
use crate::store::LogStore;

/// Lifecycle phase of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No refresh has run yet; views are empty.
    Idle,
    /// A command is in flight.
    Loading,
    /// At least one refresh has completed.
    Loaded,
}

/// How a command trigger was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran to completion.
    Completed,
    /// The trigger arrived while another command was loading and was
    /// ignored. State is untouched; the host may simply re-trigger.
    Busy,
}

impl CommandOutcome {
    pub fn is_busy(&self) -> bool {
        matches!(self, CommandOutcome::Busy)
    }
}

const STATUS_NOT_CONNECTED: &str = "not connected";
const STATUS_CONNECTED: &str = "connected";

/// Paginated log monitor over a [`LogStore`].
///
/// The cursor offset is the position of the next page to fetch and is
/// committed only after a non-empty fetch. An empty page (exhausted or
/// failed) leaves both the offset and the accumulated view at their
/// pre-call values, so re-fetching the same position never duplicates or
/// skips records.
///
/// Commands take `&mut self`, so overlapping invocations against one
/// monitor are unrepresentable in-process; the `Loading` phase guard
/// additionally rejects re-entrant triggers from hosts that queue commands
/// around shared state.
pub struct LogMonitor<S> {
    executor: Executor<S>,
    phase: Phase,
    cursor: PaginationCursor,
    logs: AccumulatedView,
    stats: StatView,
    last_failure: Option<FetchFailure>,
    connection_status: String,
}

impl<S: LogStore> LogMonitor<S> {
    /// Create an idle monitor with empty views.
    pub fn new(store: S, page_size: i64) -> Result<Self> {
        Ok(Self {
            executor: Executor::new(store),
            phase: Phase::Idle,
            cursor: PaginationCursor::new(page_size)?,
            logs: AccumulatedView::new(),
            stats: StatView::new(),
            last_failure: None,
            connection_status: STATUS_NOT_CONNECTED.to_string(),
        })
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Start a new refresh epoch: reset the offset to 0, re-fetch page 0
    /// and the stat rollup, and replace both views with the results (even
    /// when empty). The only entry point that may reset the epoch.
    pub async fn refresh(&mut self) -> Result<CommandOutcome> {
        if self.phase == Phase::Loading {
            debug!("refresh ignored: a command is already loading");
            return Ok(CommandOutcome::Busy);
        }
        self.phase = Phase::Loading;

        self.cursor.reset();
        let page = self.executor.logs(0, self.cursor.page_size()).await;
        let stats = self.executor.stats().await;

        self.last_failure = page.failure.or(stats.failure);
        if !page.records.is_empty() {
            self.cursor.advance();
        }
        self.logs.replace(page.records);
        self.stats.replace(stats.records);
        self.phase = Phase::Loaded;

        info!(
            logs = self.logs.len(),
            apps = self.stats.records().len(),
            "refresh complete"
        );
        Ok(CommandOutcome::Completed)
    }

    /// Fetch the next page and append it to the accumulated view.
    ///
    /// The offset advance is transactional with the fetch outcome: a
    /// non-empty page appends and commits it, an empty page (exhausted or
    /// failed — indistinguishable here unless [`last_failure`] is
    /// consulted) leaves the offset at its pre-call value and the view
    /// unchanged. Re-attempting after the terminal empty page yields
    /// identical results.
    ///
    /// Calling this before any [`refresh`] is an `InvalidState` error.
    ///
    /// [`refresh`]: LogMonitor::refresh
    /// [`last_failure`]: LogMonitor::last_failure
    pub async fn load_more(&mut self) -> Result<CommandOutcome> {
        match self.phase {
            Phase::Idle => {
                return Err(GridlogError::InvalidState(
                    "load_more called before refresh populated the monitor".to_string(),
                ))
            }
            Phase::Loading => {
                debug!("load_more ignored: a command is already loading");
                return Ok(CommandOutcome::Busy);
            }
            Phase::Loaded => {}
        }
        self.phase = Phase::Loading;

        let page = self
            .executor
            .logs(self.cursor.offset(), self.cursor.page_size())
            .await;

        self.last_failure = page.failure;
        if page.records.is_empty() {
            debug!(offset = self.cursor.offset(), "no more logs to load");
        } else {
            debug!(
                offset = self.cursor.offset(),
                fetched = page.records.len(),
                "page appended"
            );
            self.logs.append(page.records);
            self.cursor.advance();
        }
        self.phase = Phase::Loaded;

        Ok(CommandOutcome::Completed)
    }

    /// Refresh if and only if nothing has been loaded yet. Hosts call this
    /// on first render instead of reaching for [`load_more`].
    ///
    /// [`load_more`]: LogMonitor::load_more
    pub async fn ensure_loaded(&mut self) -> Result<CommandOutcome> {
        if self.phase == Phase::Idle {
            self.refresh().await
        } else {
            Ok(CommandOutcome::Completed)
        }
    }

    /// Read-only connectivity diagnostic. Updates only the status string;
    /// the log and stat views and the cursor are untouched either way.
    pub async fn test_connection(&mut self) -> CommandOutcome {
        if self.phase == Phase::Loading {
            debug!("test_connection ignored: a command is already loading");
            return CommandOutcome::Busy;
        }

        match self.executor.ping().await {
            Ok(()) => {
                self.connection_status = STATUS_CONNECTED.to_string();
            }
            Err(err) => {
                warn!(error = %err, "connection test failed");
                self.connection_status = format!("connection failed: {}", err);
            }
        }
        CommandOutcome::Completed
    }

    /// Adopt a previously persisted accumulated view (host session
    /// storage). The cursor is positioned past the restored records so a
    /// subsequent [`load_more`] continues where the snapshot left off.
    ///
    /// Malformed input is discarded: the monitor is left idle and empty and
    /// the `MalformedState` error is returned for observability. The
    /// monitor is in a valid state on every return path.
    ///
    /// [`load_more`]: LogMonitor::load_more
    pub fn restore_snapshot(&mut self, json: &str) -> Result<()> {
        match AccumulatedView::restore(json) {
            Ok(view) => {
                self.cursor.reset_past(view.len());
                self.logs = view;
                self.phase = Phase::Loaded;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "discarding malformed accumulated state");
                self.logs.clear();
                self.cursor.reset();
                self.phase = Phase::Idle;
                Err(err)
            }
        }
    }

    // ── Read models ─────────────────────────────────────────────────────

    /// The accumulated log view for the current epoch.
    pub fn logs(&self) -> &[LogRecord] {
        self.logs.records()
    }

    /// Snapshot of the accumulated view for host-side persistence.
    pub fn snapshot(&self) -> Result<String> {
        self.logs.snapshot()
    }

    /// The current stat rollup, count descending.
    pub fn stats(&self) -> &[StatRecord] {
        self.stats.records()
    }

    /// Total logs across the listed apps.
    pub fn stats_total(&self) -> i64 {
        self.stats.total()
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The failure recorded by the most recent fetch, if any. Cleared by a
    /// subsequent successful fetch.
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// Human-readable connection status from the last test_connection.
    pub fn connection_status(&self) -> &str {
        &self.connection_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FetchFailureKind;
    use crate::testing::{log_page, log_record, stat_record, MockLogStore, StoreCall};

    fn monitor_with(store: MockLogStore, page_size: i64) -> LogMonitor<MockLogStore> {
        LogMonitor::new(store, page_size).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_populates_views() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(5, "billing"), log_record(4, "auth")]);
        store.push_stats(vec![stat_record("billing", 42), stat_record("auth", 17)]);
        let mut monitor = monitor_with(store, 100);

        let outcome = monitor.refresh().await.unwrap();
        assert_eq!(outcome, CommandOutcome::Completed);
        assert_eq!(monitor.phase(), Phase::Loaded);
        assert_eq!(monitor.logs().len(), 2);
        assert_eq!(monitor.stats().len(), 2);
        assert_eq!(monitor.stats_total(), 59);
        // Non-empty page 0 commits the next fetch position.
        assert_eq!(monitor.cursor().offset(), 100);
        assert!(monitor.last_failure().is_none());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let store = MockLogStore::new();
        let page = vec![log_record(5, "billing"), log_record(4, "auth")];
        let stats = vec![stat_record("billing", 42)];
        store.push_logs(page.clone());
        store.push_stats(stats.clone());
        store.push_logs(page.clone());
        store.push_stats(stats.clone());
        let mut monitor = monitor_with(store, 100);

        monitor.refresh().await.unwrap();
        let first_logs = monitor.logs().to_vec();
        let first_stats = monitor.stats().to_vec();
        let first_offset = monitor.cursor().offset();

        monitor.refresh().await.unwrap();
        assert_eq!(monitor.logs(), first_logs.as_slice());
        assert_eq!(monitor.stats(), first_stats.as_slice());
        assert_eq!(monitor.cursor().offset(), first_offset);

        // Both epochs fetched page 0.
        let offsets: Vec<i64> = monitor
            .executor
            .store()
            .calls()
            .iter()
            .filter_map(|c| match c {
                StoreCall::Logs { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, vec![0, 0]);
    }

    #[tokio::test]
    async fn test_load_more_appends_in_order() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(10, "billing"), log_record(9, "billing")]);
        store.push_stats(vec![]);
        store.push_logs(vec![log_record(8, "auth"), log_record(7, "auth")]);
        let mut monitor = monitor_with(store, 2);

        monitor.refresh().await.unwrap();
        monitor.load_more().await.unwrap();

        let ids: Vec<i64> = monitor.logs().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 9, 8, 7]);
        assert_eq!(monitor.cursor().offset(), 4);
    }

    // Scenario: page_size 100, the first fetch returns a full page, the
    // next returns nothing. Offset becomes 100 and stays there; the view
    // keeps its 100 records.
    #[tokio::test]
    async fn test_full_page_then_empty_page() {
        let store = MockLogStore::new();
        store.push_logs(log_page(100, 100, "scada"));
        store.push_stats(vec![]);
        // Nothing scripted for the second fetch: the mock returns an empty
        // page, the exhausted signal.
        let mut monitor = monitor_with(store, 100);

        monitor.refresh().await.unwrap();
        assert_eq!(monitor.logs().len(), 100);
        assert_eq!(monitor.cursor().offset(), 100);

        let before = monitor.logs().to_vec();
        monitor.load_more().await.unwrap();
        assert_eq!(monitor.cursor().offset(), 100);
        assert_eq!(monitor.logs(), before.as_slice());
    }

    #[tokio::test]
    async fn test_empty_page_is_terminal_and_repeatable() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(3, "billing")]);
        store.push_stats(vec![]);
        let mut monitor = monitor_with(store, 1);

        monitor.refresh().await.unwrap();
        assert_eq!(monitor.cursor().offset(), 1);

        // Exhausted: offset and view are their pre-call values, and the
        // terminal signal is only observable by re-attempting with
        // identical results.
        for _ in 0..2 {
            monitor.load_more().await.unwrap();
            assert_eq!(monitor.cursor().offset(), 1);
            assert_eq!(monitor.logs().len(), 1);
        }
    }

    // Refresh after load_more has walked the offset out replaces the view
    // with the fresh offset-0 page instead of merging.
    #[tokio::test]
    async fn test_refresh_after_load_more_replaces() {
        let store = MockLogStore::new();
        store.push_logs(log_page(300, 100, "scada"));
        store.push_stats(vec![]);
        store.push_logs(log_page(200, 100, "scada"));
        store.push_logs(log_page(100, 100, "scada"));
        store.push_logs(vec![log_record(999, "fresh")]);
        store.push_stats(vec![]);
        let mut monitor = monitor_with(store, 100);

        monitor.refresh().await.unwrap();
        monitor.load_more().await.unwrap();
        monitor.load_more().await.unwrap();
        assert_eq!(monitor.cursor().offset(), 300);
        assert_eq!(monitor.logs().len(), 300);

        monitor.refresh().await.unwrap();
        let ids: Vec<i64> = monitor.logs().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![999]);
        // The new epoch re-fetched page 0.
        let last_fetch = monitor
            .executor
            .store()
            .calls()
            .iter()
            .filter_map(|c| match c {
                StoreCall::Logs { offset, .. } => Some(*offset),
                _ => None,
            })
            .last();
        assert_eq!(last_fetch, Some(0));
        assert_eq!(monitor.cursor().offset(), 100);
    }

    #[tokio::test]
    async fn test_load_more_before_refresh_is_invalid_state() {
        let store = MockLogStore::new();
        let mut monitor = monitor_with(store, 100);

        let err = monitor.load_more().await.unwrap_err();
        assert!(matches!(err, GridlogError::InvalidState(_)));
        assert_eq!(monitor.phase(), Phase::Idle);
        assert_eq!(monitor.cursor().offset(), 0);
        assert!(monitor.logs().is_empty());
        // The store was never touched.
        assert!(monitor.executor.store().calls().is_empty());
    }

    #[tokio::test]
    async fn test_busy_guard_rejects_reentrant_triggers() {
        let store = MockLogStore::new();
        let mut monitor = monitor_with(store, 100);
        monitor.phase = Phase::Loading;

        assert_eq!(monitor.refresh().await.unwrap(), CommandOutcome::Busy);
        assert_eq!(monitor.load_more().await.unwrap(), CommandOutcome::Busy);
        assert!(monitor.test_connection().await.is_busy());
        // Nothing reached the store, nothing moved.
        assert!(monitor.executor.store().calls().is_empty());
        assert_eq!(monitor.cursor().offset(), 0);
        assert_eq!(monitor.connection_status(), "not connected");
    }

    #[tokio::test]
    async fn test_ensure_loaded_refreshes_only_once() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(1, "billing")]);
        store.push_stats(vec![]);
        let mut monitor = monitor_with(store, 100);

        monitor.ensure_loaded().await.unwrap();
        assert_eq!(monitor.logs().len(), 1);

        // Second call is a no-op; nothing further was scripted, so a real
        // refresh would have emptied the view.
        monitor.ensure_loaded().await.unwrap();
        assert_eq!(monitor.logs().len(), 1);
        assert_eq!(
            monitor
                .executor
                .store()
                .calls()
                .iter()
                .filter(|c| matches!(c, StoreCall::Logs { .. }))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded_not_raised() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(1, "billing")]);
        store.push_stats(vec![]);
        store.push_logs_error(GridlogError::Connection("host unreachable".to_string()));
        let mut monitor = monitor_with(store, 100);

        monitor.refresh().await.unwrap();
        monitor.load_more().await.unwrap();

        // Failure looks like an empty page: offset and view untouched.
        assert_eq!(monitor.cursor().offset(), 100);
        assert_eq!(monitor.logs().len(), 1);
        let failure = monitor.last_failure().expect("failure channel set");
        assert_eq!(failure.kind, FetchFailureKind::Connection);
        assert!(!failure.message.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_replaces_with_empty_and_records() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(1, "billing")]);
        store.push_stats(vec![stat_record("billing", 1)]);
        store.push_logs_error(GridlogError::Query("relation missing".to_string()));
        store.push_stats(vec![]);
        let mut monitor = monitor_with(store, 100);

        monitor.refresh().await.unwrap();
        assert_eq!(monitor.logs().len(), 1);

        monitor.refresh().await.unwrap();
        // Replacement happens even when the fetch came back empty-on-error.
        assert!(monitor.logs().is_empty());
        assert_eq!(monitor.cursor().offset(), 0);
        assert_eq!(
            monitor.last_failure().unwrap().kind,
            FetchFailureKind::Query
        );
    }

    // A failed connection test leaves prior data untouched and carries a
    // non-empty message.
    #[tokio::test]
    async fn test_connection_failure_leaves_data_untouched() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(7, "billing")]);
        store.push_stats(vec![stat_record("billing", 7)]);
        store.push_ping_error(GridlogError::Connection(
            "could not connect to host db.internal".to_string(),
        ));
        let mut monitor = monitor_with(store, 100);

        monitor.refresh().await.unwrap();
        let offset_before = monitor.cursor().offset();
        monitor.test_connection().await;

        assert!(monitor.connection_status().contains("connection failed"));
        assert!(monitor
            .connection_status()
            .contains("could not connect to host db.internal"));
        assert_eq!(monitor.logs().len(), 1);
        assert_eq!(monitor.stats().len(), 1);
        assert_eq!(monitor.cursor().offset(), offset_before);
    }

    #[tokio::test]
    async fn test_connection_success_sets_status() {
        let store = MockLogStore::new();
        let mut monitor = monitor_with(store, 100);

        assert_eq!(monitor.connection_status(), "not connected");
        monitor.test_connection().await;
        assert_eq!(monitor.connection_status(), "connected");
    }

    #[tokio::test]
    async fn test_restore_snapshot_continues_pagination() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(1, "billing")]);
        let mut monitor = monitor_with(store, 100);

        let persisted = serde_json::to_string(&log_page(200, 200, "scada")).unwrap();
        monitor.restore_snapshot(&persisted).unwrap();

        assert_eq!(monitor.phase(), Phase::Loaded);
        assert_eq!(monitor.logs().len(), 200);
        assert_eq!(monitor.cursor().offset(), 200);

        // load_more picks up where the snapshot left off.
        monitor.load_more().await.unwrap();
        assert_eq!(monitor.logs().len(), 201);
        assert_eq!(monitor.cursor().offset(), 300);
        match monitor.executor.store().calls().as_slice() {
            [StoreCall::Logs { offset, limit }] => {
                assert_eq!(*offset, 200);
                assert_eq!(*limit, 100);
            }
            calls => panic!("unexpected calls: {:?}", calls),
        }
    }

    #[tokio::test]
    async fn test_restore_snapshot_malformed_recovers_empty() {
        let store = MockLogStore::new();
        let mut monitor = monitor_with(store, 100);

        let err = monitor.restore_snapshot("][ not json").unwrap_err();
        assert!(matches!(err, GridlogError::MalformedState(_)));
        assert_eq!(monitor.phase(), Phase::Idle);
        assert!(monitor.logs().is_empty());
        assert_eq!(monitor.cursor().offset(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_through_monitor() {
        let store = MockLogStore::new();
        store.push_logs(vec![log_record(2, "billing"), log_record(1, "auth")]);
        store.push_stats(vec![]);
        let mut monitor = monitor_with(store, 100);
        monitor.refresh().await.unwrap();

        let json = monitor.snapshot().unwrap();
        let mut second = monitor_with(MockLogStore::new(), 100);
        second.restore_snapshot(&json).unwrap();
        assert_eq!(second.logs(), monitor.logs());
    }
}
