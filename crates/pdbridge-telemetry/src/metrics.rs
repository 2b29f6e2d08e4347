use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Type of metric.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Counter,
    Gauge,
}

/// A persisted snapshot of a metric value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub id: i64,
    pub timestamp: String,
    pub name: String,
    pub value: f64,
    pub labels: Option<String>,
    pub metric_type: MetricType,
}

/// In-memory counter. Monotonically increasing.
struct Counter {
    value: AtomicU64,
}

impl Counter {
    fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }
    fn increment(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }
    fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// In-memory gauge, stored as f64 bits.
struct Gauge {
    bits: AtomicU64,
}

impl Gauge {
    fn new() -> Self {
        Self {
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }
    fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }
    fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Metric key: name + sorted labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct MetricKey {
    name: String,
    labels: Vec<(String, String)>,
}

impl MetricKey {
    fn new(name: impl Into<String>, labels: &[(&str, &str)]) -> Self {
        let mut sorted: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            name: name.into(),
            labels: sorted,
        }
    }

    fn labels_json(&self) -> Option<String> {
        if self.labels.is_empty() {
            return None;
        }
        let map: HashMap<&str, &str> = self
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        serde_json::to_string(&map).ok()
    }
}

/// Thread-safe diagnostic counters and gauges, optionally snapshotted to SQLite.
pub struct MetricsRecorder {
    counters: RwLock<HashMap<MetricKey, Counter>>,
    gauges: RwLock<HashMap<MetricKey, Gauge>>,
    db: Option<Mutex<Connection>>,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl MetricsRecorder {
    /// Recorder without persistence; `snapshot` is a no-op.
    pub fn in_memory() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
            db: None,
        }
    }

    /// Recorder that persists snapshots to the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             CREATE TABLE IF NOT EXISTS metrics_snapshots (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 timestamp TEXT NOT NULL,
                 name TEXT NOT NULL,
                 value REAL NOT NULL,
                 labels TEXT,
                 metric_type TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_metrics_name ON metrics_snapshots(name, timestamp);",
        )?;
        Ok(Self {
            db: Some(Mutex::new(conn)),
            ..Self::in_memory()
        })
    }

    /// Increment a counter by n.
    pub fn counter_inc(&self, name: &str, labels: &[(&str, &str)], n: u64) {
        let key = MetricKey::new(name, labels);
        let counters = self.counters.read();
        if let Some(c) = counters.get(&key) {
            c.increment(n);
            return;
        }
        drop(counters);
        let mut counters = self.counters.write();
        counters.entry(key).or_insert_with(Counter::new).increment(n);
    }

    /// Set a gauge to a specific value.
    pub fn gauge_set(&self, name: &str, labels: &[(&str, &str)], value: f64) {
        let key = MetricKey::new(name, labels);
        let gauges = self.gauges.read();
        if let Some(g) = gauges.get(&key) {
            g.set(value);
            return;
        }
        drop(gauges);
        let mut gauges = self.gauges.write();
        gauges.entry(key).or_insert_with(Gauge::new).set(value);
    }

    pub fn counter_get(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        let key = MetricKey::new(name, labels);
        self.counters.read().get(&key).map_or(0, Counter::get)
    }

    pub fn gauge_get(&self, name: &str, labels: &[(&str, &str)]) -> f64 {
        let key = MetricKey::new(name, labels);
        self.gauges.read().get(&key).map_or(0.0, Gauge::get)
    }

    /// Persist every current value. Returns the number of rows written.
    pub fn snapshot(&self) -> Result<usize, rusqlite::Error> {
        let Some(db) = &self.db else {
            return Ok(0);
        };
        let now = Utc::now().to_rfc3339();
        let db = db.lock();
        let mut count = 0;

        for (key, counter) in self.counters.read().iter() {
            db.execute(
                "INSERT INTO metrics_snapshots (timestamp, name, value, labels, metric_type)
                 VALUES (?1, ?2, ?3, ?4, 'counter')",
                rusqlite::params![now, key.name, counter.get() as f64, key.labels_json()],
            )?;
            count += 1;
        }

        for (key, gauge) in self.gauges.read().iter() {
            db.execute(
                "INSERT INTO metrics_snapshots (timestamp, name, value, labels, metric_type)
                 VALUES (?1, ?2, ?3, ?4, 'gauge')",
                rusqlite::params![now, key.name, gauge.get(), key.labels_json()],
            )?;
            count += 1;
        }

        Ok(count)
    }

    /// Latest snapshots for `name`, newest first.
    pub fn query(&self, name: &str, limit: u32) -> Result<Vec<MetricsSnapshot>, rusqlite::Error> {
        let Some(db) = &self.db else {
            return Ok(Vec::new());
        };
        let db = db.lock();
        let mut stmt = db.prepare(
            "SELECT id, timestamp, name, value, labels, metric_type FROM metrics_snapshots
             WHERE name = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![name, limit], |row| {
            let mt_str: String = row.get(5)?;
            let metric_type = match mt_str.as_str() {
                "gauge" => MetricType::Gauge,
                _ => MetricType::Counter,
            };
            Ok(MetricsSnapshot {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                name: row.get(2)?,
                value: row.get(3)?,
                labels: row.get(4)?,
                metric_type,
            })
        })?;
        rows.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_basic() {
        let recorder = MetricsRecorder::in_memory();
        recorder.counter_inc("commands.delivered", &[("source", "queue")], 1);
        recorder.counter_inc("commands.delivered", &[("source", "queue")], 1);
        recorder.counter_inc("commands.delivered", &[("source", "direct")], 1);

        assert_eq!(recorder.counter_get("commands.delivered", &[("source", "queue")]), 2);
        assert_eq!(recorder.counter_get("commands.delivered", &[("source", "direct")]), 1);
        assert_eq!(recorder.counter_get("commands.delivered", &[]), 0);
    }

    #[test]
    fn gauge_overwrites() {
        let recorder = MetricsRecorder::in_memory();
        recorder.gauge_set("queue.depth", &[], 3.0);
        recorder.gauge_set("queue.depth", &[], 1.0);
        assert_eq!(recorder.gauge_get("queue.depth", &[]), 1.0);
        assert_eq!(recorder.gauge_get("missing", &[]), 0.0);
    }

    #[test]
    fn label_ordering_independent() {
        let recorder = MetricsRecorder::in_memory();
        recorder.counter_inc("test", &[("a", "1"), ("b", "2")], 1);
        recorder.counter_inc("test", &[("b", "2"), ("a", "1")], 1);
        assert_eq!(recorder.counter_get("test", &[("a", "1"), ("b", "2")]), 2);
    }

    #[test]
    fn in_memory_snapshot_is_noop() {
        let recorder = MetricsRecorder::in_memory();
        recorder.counter_inc("x", &[], 1);
        assert_eq!(recorder.snapshot().unwrap(), 0);
        assert!(recorder.query("x", 10).unwrap().is_empty());
    }

    #[test]
    fn snapshot_persists_to_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = MetricsRecorder::open(&dir.path().join("metrics.db")).unwrap();
        recorder.counter_inc("readline.dropped", &[], 2);
        recorder.gauge_set("queue.depth", &[("session", "1")], 4.0);

        assert_eq!(recorder.snapshot().unwrap(), 2);

        let dropped = recorder.query("readline.dropped", 10).unwrap();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].value, 2.0);
        assert_eq!(dropped[0].metric_type, MetricType::Counter);

        let depth = recorder.query("queue.depth", 10).unwrap();
        assert_eq!(depth[0].metric_type, MetricType::Gauge);
        assert!(depth[0].labels.as_deref().unwrap().contains("session"));
    }

    #[test]
    fn concurrent_counter_increments() {
        use std::sync::Arc;
        use std::thread;

        let recorder = Arc::new(MetricsRecorder::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = recorder.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        r.counter_inc("concurrent", &[], 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(recorder.counter_get("concurrent", &[]), 4_000);
    }
}
