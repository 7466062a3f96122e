//! Row sources — the one capability a storage backend has to provide.
//!
//! [`fetch_results`] owns the degradation policy: projected query first, then
//! a `SELECT *` fallback with a wider alias table, and an empty result set
//! whenever the results table does not exist yet.

use crate::error::{FetchError, StoreError};
use crate::normalizer::{normalize_rows, FieldMap};
use crate::types::{DrawResult, RawRow};
use std::future::Future;
use tracing::{debug, info, warn};

/// Which of the two query forms to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    /// Explicit columns, with `draw_number` aliased to `drawNumber`, ordered
    /// by `draw_number`.
    Projected,
    /// `SELECT *`, ordered by `drawNumber`.
    Wildcard,
}

impl QueryShape {
    /// Alias table used to normalise rows of this shape.
    pub fn field_map(self) -> &'static FieldMap {
        match self {
            QueryShape::Projected => &FieldMap::PRIMARY,
            QueryShape::Wildcard => &FieldMap::EXTENDED,
        }
    }
}

impl std::fmt::Display for QueryShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryShape::Projected => write!(f, "projected"),
            QueryShape::Wildcard => write!(f, "wildcard"),
        }
    }
}

/// Which storage engine backs a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Sqlite,
    Postgres,
    Memory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::Postgres => write!(f, "postgres"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

/// Implemented by each storage backend.
pub trait RowSource: Send + Sync {
    /// The most recent `limit` rows, newest first as far as the store can tell.
    /// A missing results table must be reported as [`StoreError::MissingTable`].
    fn fetch_recent_rows(
        &self,
        shape: QueryShape,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawRow>, StoreError>> + Send;

    /// Liveness probe (`SELECT 1` or equivalent).
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn backend(&self) -> BackendKind;
}

/// Fetch and normalise the latest `limit` draws.
///
/// Storage order is kept; callers that present results should re-sort them
/// (see [`ResultsPage::new`](crate::ResultsPage::new)).
pub async fn fetch_results<S>(source: &S, limit: usize) -> Result<Vec<DrawResult>, FetchError>
where
    S: RowSource + ?Sized,
{
    let backend = source.backend();

    match source.fetch_recent_rows(QueryShape::Projected, limit).await {
        Ok(rows) => {
            if rows.is_empty() {
                info!(%backend, "no results found in database");
            } else {
                debug!(%backend, rows = rows.len(), "projected query succeeded");
            }
            return Ok(normalize_rows(&rows, QueryShape::Projected.field_map()));
        }
        Err(StoreError::MissingTable(table)) => {
            info!(%backend, %table, "results table not created yet");
            return Ok(Vec::new());
        }
        Err(err) => {
            warn!(%backend, error = %err, "projected query failed, trying alternative column names");
        }
    }

    match source.fetch_recent_rows(QueryShape::Wildcard, limit).await {
        Ok(rows) => {
            debug!(%backend, rows = rows.len(), "wildcard query succeeded");
            Ok(normalize_rows(&rows, QueryShape::Wildcard.field_map()))
        }
        Err(StoreError::MissingTable(table)) => {
            info!(%backend, %table, "results table not created yet");
            Ok(Vec::new())
        }
        Err(cause) => Err(FetchError::Fallback { source: cause }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
