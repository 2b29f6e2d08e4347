use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::errors::HistoryError;

/// One executed debugger command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Store session (one per process run).
    pub session: i64,
    /// Line counter within the debug loop that produced the command.
    pub line: u64,
    pub text: String,
}

/// Durable, append-only command log with bounded tail reads.
pub trait HistoryLog: Send + Sync {
    fn append(&self, line_number: u64, text: &str) -> Result<(), HistoryError>;

    /// The most recent `max_count` records in chronological order. With
    /// `include_latest == false` the newest record is left out.
    fn read_tail(&self, max_count: usize, include_latest: bool)
        -> Result<Vec<HistoryRecord>, HistoryError>;
}

/// Volatile log for tests and for running without a history database.
#[derive(Debug, Default)]
pub struct MemoryHistoryLog {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(texts: &[&str]) -> Self {
        let records = texts
            .iter()
            .enumerate()
            .map(|(i, text)| HistoryRecord {
                session: 0,
                line: i as u64 + 1,
                text: (*text).to_string(),
            })
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl HistoryLog for MemoryHistoryLog {
    fn append(&self, line_number: u64, text: &str) -> Result<(), HistoryError> {
        self.records.lock().push(HistoryRecord {
            session: 0,
            line: line_number,
            text: text.to_string(),
        });
        Ok(())
    }

    fn read_tail(
        &self,
        max_count: usize,
        include_latest: bool,
    ) -> Result<Vec<HistoryRecord>, HistoryError> {
        let records = self.records.lock();
        let end = if include_latest {
            records.len()
        } else {
            records.len().saturating_sub(1)
        };
        let start = end.saturating_sub(max_count);
        Ok(records[start..end].to_vec())
    }
}
