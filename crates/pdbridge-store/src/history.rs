use chrono::Utc;
use tracing::instrument;

use pdbridge_core::errors::HistoryError;
use pdbridge_core::history::{HistoryLog, HistoryRecord};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

/// SQLite-backed debugger command history. Each repo instance writes under its
/// own session row, opened when the repo is created.
pub struct HistoryRepo {
    db: Database,
    session: i64,
}

impl HistoryRepo {
    /// Start a new history session on `db`.
    #[instrument(skip(db), fields(path = %db.path().display()))]
    pub fn open_session(db: Database) -> Result<Self, StoreError> {
        let now = Utc::now().to_rfc3339();
        let session = db.with_conn(|conn| {
            conn.execute("INSERT INTO sessions (started_at) VALUES (?1)", [&now])?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::debug!(session, "history session opened");
        Ok(Self { db, session })
    }

    /// Handle for reading and clearing the history without starting a session.
    /// Appends through it are rejected by the session foreign key.
    pub fn reader(db: Database) -> Self {
        Self { db, session: 0 }
    }

    pub fn session(&self) -> i64 {
        self.session
    }

    /// Append one command under the current session.
    #[instrument(skip(self, text), fields(session = self.session))]
    pub fn store_input(&self, line_number: u64, text: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO history (session, line, source, recorded_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![self.session, line_number as i64, text, now],
            )?;
            Ok(())
        })
    }

    /// The newest `n` records across all sessions, oldest first.
    #[instrument(skip(self))]
    pub fn tail(&self, n: usize, include_latest: bool) -> Result<Vec<HistoryRecord>, StoreError> {
        let offset: i64 = if include_latest { 0 } else { 1 };
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT session, line, source FROM history
                 ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            )?;
            let mut rows = stmt.query(rusqlite::params![limit, offset])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(row_to_record(row)?);
            }
            records.reverse();
            Ok(records)
        })
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        self.db.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
            Ok(n as u64)
        })
    }

    /// Delete every stored command. Session rows are kept.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<usize, StoreError> {
        self.db
            .with_conn(|conn| Ok(conn.execute("DELETE FROM history", [])?))
    }
}

impl HistoryLog for HistoryRepo {
    fn append(&self, line_number: u64, text: &str) -> Result<(), HistoryError> {
        Ok(self.store_input(line_number, text)?)
    }

    fn read_tail(
        &self,
        max_count: usize,
        include_latest: bool,
    ) -> Result<Vec<HistoryRecord>, HistoryError> {
        self.tail(max_count, include_latest)
            .map_err(|e| HistoryError::Read(e.to_string()))
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<HistoryRecord, StoreError> {
    Ok(HistoryRecord {
        session: row_helpers::get(row, 0, "history", "session")?,
        line: row_helpers::get_u64(row, 1, "history", "line")?,
        text: row_helpers::get(row, 2, "history", "source")?,
    })
}
