mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Params, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("failed to open database at {path}: {message}")]
    Init { path: String, message: String },
    /// A constraint was violated, e.g. a duplicate category name.
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("storage failure: {0}")]
    Sqlite(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::Integrity(e.to_string())
            }
            _ => StorageError::Sqlite(e.to_string()),
        }
    }
}

/// Storage gateway around one SQLite file. Holds only the path: every call
/// opens its own connection and closes it on return, so nothing outlives a
/// single statement and each statement auto-commits.
#[derive(Debug)]
pub(crate) struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Open or create the database file, make sure the schema exists and the
    /// default categories are seeded.
    pub(crate) fn open(path: &Path) -> Result<Self, StorageError> {
        let db = Self {
            path: path.to_path_buf(),
        };
        db.init().map_err(|e| StorageError::Init {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(db)
    }

    fn init(&self) -> Result<(), StorageError> {
        let conn = self.connect()?;
        conn.execute_batch(schema::SCHEMA)?;
        for (name, kind) in schema::DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT OR IGNORE INTO categories (name, type) VALUES (?1, ?2)",
                rusqlite::params![name, kind.as_str()],
            )?;
        }
        Ok(())
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(conn)
    }

    /// Run a parameterized mutating statement; returns the affected row count.
    pub(crate) fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, StorageError> {
        let conn = self.connect()?;
        Ok(conn.execute(sql, params)?)
    }

    /// Run a parameterized read query, mapping every row through `map`.
    pub(crate) fn fetch_all<T, P, F>(
        &self,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Vec<T>, StorageError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Like `fetch_all`, but returns the first row or `None`.
    pub(crate) fn fetch_one<T, P, F>(
        &self,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Option<T>, StorageError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        match conn.query_row(sql, params, map) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests;
