//! Read-only access to the Fail2Ban SQLite database.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row};

use crate::error::StoreError;

/// One read-only connection, held for the whole run.
///
/// Statements are prepared, stepped to completion and dropped one at a time.
#[derive(Debug)]
pub struct BanStore {
    conn: Connection,
}

impl BanStore {
    /// Opens `path` read-only.
    ///
    /// SQLite defers reading the file until first use, so the schema is
    /// touched once here to make unreadable or corrupt files fail up front.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let open_error = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_error)?;

        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(open_error)?;

        tracing::debug!(path = %path.display(), "Opened ban database");
        Ok(Self { conn })
    }

    /// Wraps an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Runs `sql` and hands every row to `on_row`, in emission order.
    ///
    /// Rows handled before a step failure stay handled; the failure is
    /// returned afterwards.
    pub fn for_each_row<F>(&self, sql: &str, mut on_row: F) -> Result<(), StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<()>,
    {
        if sql.trim().is_empty() {
            return Err(StoreError::EmptyQuery);
        }

        let mut statement = self.conn.prepare(sql).map_err(StoreError::Prepare)?;
        let mut rows = statement.query([]).map_err(StoreError::Step)?;
        while let Some(row) = rows.next().map_err(StoreError::Step)? {
            on_row(row).map_err(StoreError::Step)?;
        }
        Ok(())
    }

    /// Collects every row of `sql` through `map`.
    pub fn query_rows<T, F>(&self, sql: &str, mut map: F) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut out = Vec::new();
        self.for_each_row(sql, |row| {
            out.push(map(row)?);
            Ok(())
        })?;
        Ok(out)
    }

    /// First column of the first row as an integer; `None` for no rows.
    pub fn query_scalar(&self, sql: &str) -> Result<Option<i64>, StoreError> {
        let mut value = None;
        self.for_each_row(sql, |row| {
            if value.is_none() {
                value = Some(row.get::<_, i64>(0)?);
            }
            Ok(())
        })?;
        Ok(value)
    }

    /// Closes the connection. Call exactly once at shutdown.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Close(e))
    }
}
