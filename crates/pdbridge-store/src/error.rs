use pdbridge_core::errors::HistoryError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("corrupt row in {table}.{column}: {detail}")]
    CorruptRow {
        table: &'static str,
        column: &'static str,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<StoreError> for HistoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(msg) => HistoryError::Unavailable(msg),
            StoreError::CorruptRow { .. } | StoreError::NotFound(_) => {
                HistoryError::Read(e.to_string())
            }
            StoreError::Database(msg) => HistoryError::Write(msg),
        }
    }
}
