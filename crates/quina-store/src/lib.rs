//! quina-store — storage backends for quina.
//!
//! Each backend implements [`quina_core::RowSource`] and nothing more: it runs
//! one of two query shapes and hands back raw rows. [`AnyStore`] picks the
//! backend named by the configuration at startup.

pub mod bootstrap;
pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use bootstrap::{BootstrapReport, SampleDraw, SAMPLE_DRAWS};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlite::SqliteStore;

use quina_core::config::{BackendSelection, StoreConfig};
use quina_core::{BackendKind, QueryShape, RawRow, RowSource, StoreError};
use tracing::{info, warn};

/// SQL text for `shape` against `table`, with `limit_param` as the row-limit
/// placeholder (`?1` for SQLite, `$1` for PostgreSQL).
pub fn select_sql(shape: QueryShape, table: &str, limit_param: &str) -> String {
    match shape {
        QueryShape::Projected => format!(
            "SELECT draw_number AS \"drawNumber\", date, numbers \
             FROM {table} ORDER BY draw_number DESC LIMIT {limit_param}"
        ),
        QueryShape::Wildcard => {
            format!("SELECT * FROM {table} ORDER BY drawNumber DESC LIMIT {limit_param}")
        }
    }
}

/// The backend chosen at startup.
pub enum AnyStore {
    Sqlite(SqliteStore),
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl AnyStore {
    /// Open the backend selected by `config`. PostgreSQL pools connect
    /// lazily, so an unreachable server is reported by the first query or
    /// health check rather than here.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend() {
            BackendSelection::Postgres { url } => {
                PgStore::connect_lazy(&url, &config.table).map(AnyStore::Postgres)
            }
            BackendSelection::Sqlite { path, implicit } => {
                if implicit {
                    warn!(
                        path = %path.display(),
                        "DATABASE_URL not set; falling back to a local SQLite database"
                    );
                }
                let store = SqliteStore::open(&path, &config.table)?;
                info!(path = %path.display(), table = %config.table, "using SQLite store");
                Ok(AnyStore::Sqlite(store))
            }
        }
    }

    /// Create the results table if needed and seed the sample draws.
    pub async fn bootstrap(&self) -> Result<BootstrapReport, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.bootstrap().await,
            AnyStore::Postgres(s) => s.bootstrap().await,
            AnyStore::Memory(s) => Ok(s.bootstrap()),
        }
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        AnyStore::Memory(store)
    }
}

impl RowSource for AnyStore {
    async fn fetch_recent_rows(
        &self,
        shape: QueryShape,
        limit: usize,
    ) -> Result<Vec<RawRow>, StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.fetch_recent_rows(shape, limit).await,
            AnyStore::Postgres(s) => s.fetch_recent_rows(shape, limit).await,
            AnyStore::Memory(s) => s.fetch_recent_rows(shape, limit).await,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            AnyStore::Sqlite(s) => s.ping().await,
            AnyStore::Postgres(s) => s.ping().await,
            AnyStore::Memory(s) => s.ping().await,
        }
    }

    fn backend(&self) -> BackendKind {
        match self {
            AnyStore::Sqlite(s) => s.backend(),
            AnyStore::Postgres(s) => s.backend(),
            AnyStore::Memory(s) => s.backend(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
