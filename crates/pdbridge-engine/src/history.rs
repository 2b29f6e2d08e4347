use std::sync::Arc;

use pdbridge_core::commands::{is_debugger_primitive, split_command};
use pdbridge_core::history::HistoryLog;
use pdbridge_telemetry::MetricsRecorder;
use tracing::{debug, warn};

use crate::browse::HistoryBrowser;
use crate::metric_names::{HISTORY_RECORDED, HISTORY_STORE_FAILURES};

/// Debugger command history: the durable log plus the bounded in-memory list
/// used for recall.
pub struct PdbHistory {
    log: Arc<dyn HistoryLog>,
    entries: Vec<String>,
    max_entries: usize,
    browser: HistoryBrowser,
    metrics: Arc<MetricsRecorder>,
}

impl PdbHistory {
    /// Seed the recall list with the newest `max_entries` records. A log that
    /// cannot be read leaves the list empty.
    pub fn load(log: Arc<dyn HistoryLog>, max_entries: usize, metrics: Arc<MetricsRecorder>) -> Self {
        let entries = match log.read_tail(max_entries, true) {
            Ok(records) => records.into_iter().map(|r| r.text).collect(),
            Err(e) => {
                warn!(error = %e, "failed to load debugger history");
                metrics.counter_inc(HISTORY_STORE_FAILURES, &[("op", "read")], 1);
                Vec::new()
            }
        };
        debug!(count = entries.len(), "debugger history loaded");
        Self {
            log,
            entries,
            max_entries,
            browser: HistoryBrowser::new(),
            metrics,
        }
    }

    /// Record `line` unless it is empty, repeats the previous entry, or is a
    /// bare debugger primitive. Returns whether it was kept.
    ///
    /// A failing log is reported and otherwise ignored.
    pub fn record(&mut self, line_number: u64, line: &str) -> bool {
        self.browser.reset();
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        if self.entries.last().is_some_and(|last| last == line) {
            return false;
        }
        let (cmd, args) = split_command(line);
        if is_debugger_primitive(cmd) && args.is_empty() {
            return false;
        }

        self.entries.push(line.to_string());
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            let _ = self.entries.drain(..excess);
        }
        self.metrics.counter_inc(HISTORY_RECORDED, &[], 1);

        if let Err(e) = self.log.append(line_number, line) {
            warn!(line_number, error = %e, "failed to persist debugger history");
            self.metrics.counter_inc(HISTORY_STORE_FAILURES, &[("op", "append")], 1);
        }
        true
    }

    pub fn browse(&mut self, typed: &str, backward: bool) -> Option<String> {
        self.browser.browse(&self.entries, typed, backward)
    }

    pub fn reset_browse(&mut self) {
        self.browser.reset();
    }

    pub fn end_whole_line(&mut self) {
        self.browser.end_whole_line();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn browse_position(&self) -> Option<usize> {
        self.browser.position()
    }
}
