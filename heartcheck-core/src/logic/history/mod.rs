//! History Module - per-session prediction log
//!
//! Most-recent-first, in memory only, no size cap. Dropped with the
//! session that owns it.

pub mod export;
pub mod record;

use std::collections::VecDeque;
use thiserror::Error;

pub use export::HISTORY_COLUMNS;
pub use record::HistoryEntry;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("malformed history CSV at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Ordered prediction log for one session
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    /// Entries, most recent first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whole log as CSV bytes, most recent first
    pub fn export_csv(&self) -> Vec<u8> {
        export::to_csv(&self.entries())
    }

    /// Parse a CSV produced by `export_csv`
    pub fn parse_csv(bytes: &[u8]) -> Result<Vec<HistoryEntry>, HistoryError> {
        export::from_csv(bytes)
    }
}
