//! Static row corpora used across harnesses.
//!
//! Each corpus mimics one way a results table has been written in practice:
//! the snake_case layout with JSON-text numbers, the camelCase bootstrap
//! layout, comma-separated numbers, and a mix of legacy column names.

use super::builders::{camel_row, row_from_json, snake_row};
use quina_core::RawRow;
use serde_json::json;

/// Draw numbers and dates of the two sample draws seeded by `bootstrap`.
pub const SAMPLE_LATEST: (&str, &str, [i64; 5]) = ("6907", "19th December 2025", [23, 41, 46, 58, 66]);
pub const SAMPLE_PREVIOUS: (&str, &str, [i64; 5]) = ("6906", "18th December 2025", [5, 32, 51, 55, 56]);

/// snake_case columns, numbers stored as JSON text.
pub fn corpus_snake() -> Vec<RawRow> {
    vec![
        snake_row(6907, "19th December 2025", "[23,41,46,58,66]"),
        snake_row(6906, "18th December 2025", "[5,32,51,55,56]"),
        snake_row(6905, "17th December 2025", "[1,14,29,60,77]"),
    ]
}

/// camelCase columns as created by the bootstrap, with the extra id and
/// timestamp columns a `SELECT *` returns.
pub fn corpus_camel() -> Vec<RawRow> {
    let mut rows = vec![
        camel_row(6907, "19th December 2025", "[23,41,46,58,66]"),
        camel_row(6906, "18th December 2025", "[5,32,51,55,56]"),
    ];
    for (i, row) in rows.iter_mut().enumerate() {
        row.insert("id".into(), json!(i + 1));
        row.insert("createdAt".into(), json!("2025-12-20 09:00:00"));
    }
    rows
}

/// Numbers stored as comma-separated text, with stray whitespace and junk.
pub fn corpus_csv() -> Vec<RawRow> {
    vec![
        snake_row(3001, "2013-01-02", "4, 18, 33, 61, 72"),
        snake_row(3000, "2013-01-01", "10,x,20, 30 ,40,50"),
        snake_row(2999, "2012-12-31", ""),
    ]
}

/// Legacy column names only reachable through the wildcard alias table.
pub fn corpus_legacy() -> Vec<RawRow> {
    vec![
        row_from_json(json!({"draw": 12, "draw_date": "2001-03-01", "winning_numbers": [1, 2, 3, 4, 5]})),
        row_from_json(json!({"id": 11, "created_at": "2001-02-22", "nums": "6,7,8,9,10"})),
        row_from_json(json!({"id": 10})),
    ]
}

/// Eleven snake_case draws, 100..=110, inserted oldest first.
pub fn corpus_eleven() -> Vec<RawRow> {
    (100..=110)
        .map(|n| {
            let base = (n % 70) + 1;
            let numbers: Vec<i64> = (0..5).map(|i| base + i * 2).collect();
            snake_row(n, &format!("draw {n}"), json!(numbers))
        })
        .collect()
}
