//! Error types shared by storage backends and the HTTP layer.

/// Failure reported by a [`RowSource`](crate::source::RowSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The results table has not been created yet. Callers treat this as an
    /// empty data set.
    #[error("table \"{0}\" does not exist")]
    MissingTable(String),
    /// The query ran but the store rejected it (unknown column, bad SQL, ...).
    #[error("{0}")]
    Query(String),
    /// The store could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),
}

impl StoreError {
    pub fn is_missing_table(&self) -> bool {
        matches!(self, StoreError::MissingTable(_))
    }
}

/// Failure of [`fetch_results`](crate::source::fetch_results) after the
/// fallback query shape has also been tried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(
        "Database query failed: {source}. Make sure your table has columns: \
         draw_number/drawNumber, date, numbers"
    )]
    Fallback { source: StoreError },
}
