//! Data model for the log monitor core.
//!
//! - [`LogRecord`] / [`StatRecord`]: rows as fetched from the store.
//! - [`PaginationCursor`]: offset/page-size bookkeeping.
//! - [`AccumulatedView`]: the append-only log view for one refresh epoch.
//! - [`StatView`]: the wholesale-replaced per-app rollup.

use serde::{Deserialize, Serialize};

use crate::error::{GridlogError, Result};

/// A single row from the `logging.logs` table. Immutable once fetched;
/// identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub app: String,
    pub client_id: Option<String>,
    pub substation: Option<String>,
    pub feeder: Option<String>,
    /// Pre-formatted by the query as `YYYY-MM-DD HH24:MI:SS`.
    pub timestamp: String,
    pub metadata: Option<String>,
}

/// Per-app log count over the recency window. Recomputed wholesale on every
/// stat refresh; there is no incremental update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub app: String,
    pub count: i64,
}

/// Offset/page-size bookkeeping for the paginated log fetch.
///
/// `offset` is the position of the next page to fetch. Invariants:
/// `offset >= 0` and always a multiple of `page_size`; the offset advances
/// only after a non-empty fetch, so an empty page (exhausted or failed)
/// leaves it at its pre-call value. Fields are private so every mutation
/// goes through the methods that preserve this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    offset: i64,
    page_size: i64,
}

impl PaginationCursor {
    /// Create a cursor at offset 0.
    pub fn new(page_size: i64) -> Result<Self> {
        if page_size <= 0 {
            return Err(GridlogError::InvalidArgument(format!(
                "page_size must be positive, got {}",
                page_size
            )));
        }
        Ok(Self {
            offset: 0,
            page_size,
        })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Reset to the first page.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Commit one fetched page: called only after a non-empty fetch at the
    /// current offset.
    pub fn advance(&mut self) {
        self.offset += self.page_size;
    }

    /// Position the cursor just past `record_count` already-held records,
    /// rounding partial pages up (a partial page means the store was
    /// exhausted, so the next fetch may as well skip past it).
    pub fn reset_past(&mut self, record_count: usize) {
        let pages = (record_count as i64 + self.page_size - 1) / self.page_size;
        self.offset = pages * self.page_size;
    }
}

/// The in-memory, append-only concatenation of all log pages fetched within
/// the current refresh epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedView {
    records: Vec<LogRecord>,
}

impl AccumulatedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start a new epoch: discard everything and take `records` as the
    /// offset-0 page (which may be empty).
    pub fn replace(&mut self, records: Vec<LogRecord>) {
        self.records = records;
    }

    /// Append a fetched page, preserving order: existing records first,
    /// then the new ones in the order returned.
    pub fn append(&mut self, records: Vec<LogRecord>) {
        self.records.extend(records);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Serialize the view for host-side persistence.
    pub fn snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Decode a previously persisted view.
    ///
    /// Undecodable input yields `MalformedState`; callers recover by
    /// discarding and starting empty rather than treating it as fatal.
    pub fn restore(json: &str) -> Result<Self> {
        let records: Vec<LogRecord> = serde_json::from_str(json)
            .map_err(|e| GridlogError::MalformedState(e.to_string()))?;
        Ok(Self { records })
    }
}

/// The current top-apps stat rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatView {
    records: Vec<StatRecord>,
}

impl StatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn replace(&mut self, records: Vec<StatRecord>) {
        self.records = records;
    }

    /// Total logs across the listed apps, i.e. the window total the host
    /// renders alongside the per-app counts.
    pub fn total(&self) -> i64 {
        self.records.iter().map(|s| s.count).sum()
    }
}
