//! Test builders — ergonomic constructors for raw storage rows and served
//! draws.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use quina_core::{DrawResult, RawRow};
use serde_json::Value;

// ---------------------------------------------------------------------------
// RowBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawRow`] fixtures.
///
/// # Example
///
/// ```rust
/// let row = RowBuilder::new()
///     .col("draw_number", 6907)
///     .col("date", "19th December 2025")
///     .col("numbers", "[23,41,46,58,66]")
///     .build();
/// ```
#[derive(Default)]
pub struct RowBuilder {
    row: RawRow,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn col(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.row.insert(name.into(), value.into());
        self
    }

    pub fn null(mut self, name: impl Into<String>) -> Self {
        self.row.insert(name.into(), Value::Null);
        self
    }

    pub fn build(self) -> RawRow {
        self.row
    }
}

/// A row in the snake_case layout the projected query expects.
pub fn snake_row(draw_number: i64, date: &str, numbers: impl Into<Value>) -> RawRow {
    RowBuilder::new()
        .col("draw_number", draw_number)
        .col("date", date)
        .col("numbers", numbers)
        .build()
}

/// A row in the camelCase layout the bootstrap schema produces.
pub fn camel_row(draw_number: i64, date: &str, numbers: impl Into<Value>) -> RawRow {
    RowBuilder::new()
        .col("drawNumber", draw_number)
        .col("date", date)
        .col("numbers", numbers)
        .build()
}

/// Parse a JSON object literal into a row.
pub fn row_from_json(value: Value) -> RawRow {
    match value {
        Value::Object(map) => map,
        other => panic!("row_from_json expects an object, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// DrawBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for expected [`DrawResult`] values.
pub struct DrawBuilder {
    draw: DrawResult,
}

impl DrawBuilder {
    pub fn new(draw_number: impl Into<String>) -> Self {
        Self {
            draw: DrawResult {
                draw_number: draw_number.into(),
                date: quina_core::types::NO_DATE.to_string(),
                numbers: Vec::new(),
            },
        }
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.draw.date = date.into();
        self
    }

    pub fn numbers(mut self, numbers: &[i64]) -> Self {
        self.draw.numbers = numbers.iter().copied().map(Value::from).collect();
        self
    }

    pub fn build(self) -> DrawResult {
        self.draw
    }
}
