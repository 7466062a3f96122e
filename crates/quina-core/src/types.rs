//! Core types for quina-core.
//!
//! This module defines the data structures shared across all layers: the raw
//! storage row, the canonical [`DrawResult`], and the [`ResultsPage`] served to
//! the web client.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;

/// A row as returned by a storage backend: column/field name to JSON value.
///
/// Backends make no promise about which names are present; the normalizer
/// resolves them through an alias table.
pub type RawRow = serde_json::Map<String, Value>;

/// Draw number used when no alias resolves.
pub const NO_DRAW_NUMBER: &str = "N/A";

/// Draw date used when no alias resolves.
pub const NO_DATE: &str = "Unknown";

/// The canonical, storage-independent draw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    /// Never empty; [`NO_DRAW_NUMBER`] when the row carried no usable identifier.
    pub draw_number: String,
    pub date: String,
    /// Drawn numbers as decoded from the row. Array-valued input is carried
    /// verbatim, so elements are not guaranteed to be integers.
    pub numbers: Vec<Value>,
}

impl DrawResult {
    /// Draw number read as a number, the way the web client compares draws.
    pub fn numeric_draw_number(&self) -> Option<f64> {
        self.draw_number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    /// The numbers as integers, or `None` if any element is not an integer.
    pub fn integers(&self) -> Option<Vec<i64>> {
        self.numbers.iter().map(Value::as_i64).collect()
    }

    /// Check the numbers against `rules`. Nothing on the read path calls this;
    /// stored draws are served as they are.
    pub fn check(&self, rules: &DrawRules) -> Result<(), DrawViolation> {
        if self.numbers.len() != rules.count {
            return Err(DrawViolation::Count {
                expected: rules.count,
                found: self.numbers.len(),
            });
        }
        let mut seen = Vec::with_capacity(self.numbers.len());
        for (index, value) in self.numbers.iter().enumerate() {
            let n = value
                .as_i64()
                .ok_or(DrawViolation::NotInteger { index })?;
            if n < rules.min || n > rules.max {
                return Err(DrawViolation::OutOfRange {
                    value: n,
                    min: rules.min,
                    max: rules.max,
                });
            }
            if seen.contains(&n) {
                return Err(DrawViolation::Duplicate { value: n });
            }
            seen.push(n);
        }
        Ok(())
    }
}

/// Shape of a well-formed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRules {
    pub count: usize,
    pub min: i64,
    pub max: i64,
}

impl DrawRules {
    /// Quina: five distinct numbers from 1 to 80.
    pub const QUINA: DrawRules = DrawRules {
        count: 5,
        min: 1,
        max: 80,
    };
}

impl Default for DrawRules {
    fn default() -> Self {
        Self::QUINA
    }
}

/// First way in which a draw breaks its [`DrawRules`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawViolation {
    #[error("expected {expected} numbers, found {found}")]
    Count { expected: usize, found: usize },
    #[error("number at position {index} is not an integer")]
    NotInteger { index: usize },
    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("{value} is drawn more than once")]
    Duplicate { value: i64 },
}

/// Body of `GET /api/results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPage {
    pub latest: Option<DrawResult>,
    pub previous: Vec<DrawResult>,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub last_updated: DateTime<Utc>,
}

impl ResultsPage {
    /// Build a page from normalised results. Storage ordering is not trusted:
    /// results are re-sorted newest first before the latest one is split off.
    pub fn new(mut results: Vec<DrawResult>, last_updated: DateTime<Utc>) -> Self {
        sort_newest_first(&mut results);
        let mut results = results.into_iter();
        let latest = results.next();
        Self {
            latest,
            previous: results.collect(),
            last_updated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

/// Sort by numeric draw number, descending. Non-numeric draw numbers go last
/// and keep their relative order.
pub fn sort_newest_first(results: &mut [DrawResult]) {
    results.sort_by(|a, b| {
        match (a.numeric_draw_number(), b.numeric_draw_number()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&iso_millis(ts))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
