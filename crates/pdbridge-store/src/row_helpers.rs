use crate::error::StoreError;

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Convert a stored INTEGER into an unsigned counter, rejecting negatives.
pub fn get_u64(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<u64, StoreError> {
    let raw: i64 = get(row, idx, table, column)?;
    u64::try_from(raw).map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("negative value: {raw}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn one_row<T>(sql: &str, f: impl FnOnce(&rusqlite::Row<'_>) -> T) -> T {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().unwrap();
        f(row)
    }

    #[test]
    fn get_success() {
        let v: String = one_row("SELECT 'hello'", |row| get(row, 0, "t", "c").unwrap());
        assert_eq!(v, "hello");
    }

    #[test]
    fn get_type_mismatch_is_corrupt_row() {
        let result = one_row("SELECT 'text'", |row| get::<i64>(row, 0, "history", "line"));
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { table: "history", column: "line", .. })
        ));
    }

    #[test]
    fn negative_counter_rejected() {
        let result = one_row("SELECT -4", |row| get_u64(row, 0, "history", "line"));
        assert!(matches!(result, Err(StoreError::CorruptRow { .. })));
        let ok = one_row("SELECT 9", |row| get_u64(row, 0, "history", "line").unwrap());
        assert_eq!(ok, 9);
    }
}
