//! In-memory backend used by tests, benches, and the HTTP harness.
//!
//! Behaves like a SQL table closely enough to exercise the fallback path: the
//! projected shape needs `draw_number`, `date` and `numbers` on every row, the
//! wildcard shape needs `drawNumber`. It can also be switched offline or made
//! to report a missing table.

use crate::bootstrap::{BootstrapReport, SAMPLE_DRAWS};
use quina_core::normalizer::coerce_to_string;
use quina_core::{BackendKind, QueryShape, RawRow, RowSource, StoreError};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::RwLock;

const PROJECTED_COLUMNS: [&str; 3] = ["draw_number", "date", "numbers"];

pub struct MemoryStore {
    table: String,
    rows: RwLock<Vec<RawRow>>,
    online: AtomicBool,
    table_exists: AtomicBool,
}

impl MemoryStore {
    /// A store whose table exists and holds `rows`.
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self {
            table: "quina_results".to_string(),
            rows: RwLock::new(rows),
            online: AtomicBool::new(true),
            table_exists: AtomicBool::new(true),
        }
    }

    /// A store whose results table has not been created.
    pub fn without_table() -> Self {
        let store = Self::new(Vec::new());
        store.table_exists.store(false, AtomicOrdering::SeqCst);
        store
    }

    /// Simulate the database going away (or coming back).
    pub fn set_online(&self, online: bool) {
        self.online.store(online, AtomicOrdering::SeqCst);
    }

    /// Insert a row, creating the table if needed.
    pub fn push(&self, row: RawRow) {
        self.table_exists.store(true, AtomicOrdering::SeqCst);
        self.write_rows().push(row);
    }

    pub fn len(&self) -> usize {
        self.read_rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create the table and add the sample draws that are not present yet,
    /// using the SQLite bootstrap column names.
    pub fn bootstrap(&self) -> BootstrapReport {
        self.table_exists.store(true, AtomicOrdering::SeqCst);
        let mut rows = self.write_rows();
        let mut inserted = 0;
        for draw in &SAMPLE_DRAWS {
            let present = rows
                .iter()
                .any(|r| r.get("drawNumber").and_then(Value::as_i64) == Some(draw.draw_number));
            if present {
                continue;
            }
            let mut row = RawRow::new();
            row.insert("id".into(), Value::from(rows.len() as i64 + 1));
            row.insert("drawNumber".into(), Value::from(draw.draw_number));
            row.insert("date".into(), Value::from(draw.date));
            row.insert("numbers".into(), Value::from(draw.encoded_numbers()));
            rows.push(row);
            inserted += 1;
        }
        BootstrapReport {
            backend: BackendKind::Memory,
            table: self.table.clone(),
            inserted,
        }
    }

    fn read_rows(&self) -> std::sync::RwLockReadGuard<'_, Vec<RawRow>> {
        self.rows.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_rows(&self) -> std::sync::RwLockWriteGuard<'_, Vec<RawRow>> {
        self.rows.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if !self.online.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Connection("memory store is offline".into()));
        }
        Ok(())
    }

    fn select(&self, shape: QueryShape, limit: usize) -> Result<Vec<RawRow>, StoreError> {
        self.check_available()?;
        if !self.table_exists.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::MissingTable(self.table.clone()));
        }

        let rows = self.read_rows();
        let (order_column, mut selected): (&str, Vec<RawRow>) = match shape {
            QueryShape::Projected => {
                for column in PROJECTED_COLUMNS {
                    if !rows.iter().all(|r| r.contains_key(column)) {
                        return Err(StoreError::Query(format!(
                            "column \"{column}\" does not exist"
                        )));
                    }
                }
                let projected = rows
                    .iter()
                    .map(|r| {
                        let mut out = RawRow::new();
                        out.insert("drawNumber".into(), r["draw_number"].clone());
                        out.insert("date".into(), r["date"].clone());
                        out.insert("numbers".into(), r["numbers"].clone());
                        out
                    })
                    .collect();
                ("drawNumber", projected)
            }
            QueryShape::Wildcard => {
                if !rows.iter().all(|r| r.contains_key("drawNumber")) {
                    return Err(StoreError::Query(
                        "column \"drawnumber\" does not exist".into(),
                    ));
                }
                ("drawNumber", rows.clone())
            }
        };

        selected.sort_by(|a, b| descending(a.get(order_column), b.get(order_column)));
        selected.truncate(limit);
        Ok(selected)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// `ORDER BY ... DESC` over loosely typed values: numbers first, largest
/// first; everything else after, in insertion order.
fn descending(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let key = |v: Option<&Value>| v.and_then(|v| coerce_to_string(v).trim().parse::<f64>().ok());
    match (key(a), key(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl RowSource for MemoryStore {
    async fn fetch_recent_rows(
        &self,
        shape: QueryShape,
        limit: usize,
    ) -> Result<Vec<RawRow>, StoreError> {
        self.select(shape, limit)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
