//! SQLite backend — a file-embedded database behind an r2d2 pool.
//!
//! rusqlite is blocking, so every query runs on tokio's blocking pool.

use crate::bootstrap::{BootstrapReport, SAMPLE_DRAWS};
use crate::select_sql;
use quina_core::{BackendKind, QueryShape, RawRow, RowSource, StoreError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

type SqlitePool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    table: String,
    path: PathBuf,
}

impl SqliteStore {
    /// Build a pool for the database at `path`. Connections are opened on
    /// first use, so a bad path shows up in [`RowSource::ping`].
    pub fn open(path: impl AsRef<Path>, table: impl Into<String>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let manager = SqliteConnectionManager::file(&path);
        let pool = Pool::builder()
            .max_size(4)
            .min_idle(Some(0))
            .connection_timeout(Duration::from_secs(5))
            .build_unchecked(manager);
        Ok(Self {
            pool,
            table: table.into(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the results table if it does not exist and insert the sample
    /// draws, skipping any already present.
    pub async fn bootstrap(&self) -> Result<BootstrapReport, StoreError> {
        let table = self.table.clone();
        let inserted = self
            .with_connection(move |conn| {
                conn.execute_batch(&format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        drawNumber INTEGER UNIQUE NOT NULL,
                        date TEXT NOT NULL,
                        numbers TEXT NOT NULL,
                        createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
                    );"
                ))
                .map_err(|e| classify(e, &table))?;

                let mut stmt = conn
                    .prepare(&format!(
                        "INSERT OR IGNORE INTO {table} (drawNumber, date, numbers) VALUES (?1, ?2, ?3)"
                    ))
                    .map_err(|e| classify(e, &table))?;
                let mut inserted = 0;
                for draw in &SAMPLE_DRAWS {
                    inserted += stmt
                        .execute(params![draw.draw_number, draw.date, draw.encoded_numbers()])
                        .map_err(|e| classify(e, &table))?;
                }
                Ok(inserted)
            })
            .await?;

        Ok(BootstrapReport {
            backend: BackendKind::Sqlite,
            table: self.table.clone(),
            inserted,
        })
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Connection(format!("sqlite worker failed: {e}")))?
    }
}

impl RowSource for SqliteStore {
    async fn fetch_recent_rows(
        &self,
        shape: QueryShape,
        limit: usize,
    ) -> Result<Vec<RawRow>, StoreError> {
        let table = self.table.clone();
        debug!(%shape, %table, limit, "querying sqlite");
        self.with_connection(move |conn| query_rows(conn, &table, shape, limit))
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.with_connection(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(|e| StoreError::Connection(e.to_string()))
        })
        .await
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }
}

fn query_rows(
    conn: &Connection,
    table: &str,
    shape: QueryShape,
    limit: usize,
) -> Result<Vec<RawRow>, StoreError> {
    let sql = select_sql(shape, table, "?1");
    let mut stmt = conn.prepare(&sql).map_err(|e| classify(e, table))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let rows = stmt
        .query_map(params![limit], |row| {
            let mut out = RawRow::new();
            for (i, name) in columns.iter().enumerate() {
                out.insert(name.clone(), column_value(row.get_ref(i)?));
            }
            Ok(out)
        })
        .map_err(|e| classify(e, table))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| classify(e, table))
}

/// SQLite storage class → JSON. Blobs are read as UTF-8 text.
fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn classify(err: rusqlite::Error, table: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such table") => {
            StoreError::MissingTable(table.to_string())
        }
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::NotADatabase
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            StoreError::Connection(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
