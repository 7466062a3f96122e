//! Normalizer — turns [`RawRow`](crate::RawRow) values of unknown shape into
//! canonical [`DrawResult`](crate::DrawResult) records.
//!
//! Field names are resolved through a [`FieldMap`]: an ordered alias list per
//! canonical field, first populated alias wins. Numbers are decoded by
//! [`parse_numbers`]: native array → JSON-encoded array → comma-separated
//! integers → empty.

use crate::types::{DrawResult, RawRow, NO_DATE, NO_DRAW_NUMBER};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Alias tables
// ---------------------------------------------------------------------------

/// A canonical [`DrawResult`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DrawNumber,
    Date,
    Numbers,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::DrawNumber, Field::Date, Field::Numbers];
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::DrawNumber => write!(f, "drawNumber"),
            Field::Date => write!(f, "date"),
            Field::Numbers => write!(f, "numbers"),
        }
    }
}

/// Ordered alias lists mapping storage column names onto canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub draw_number: &'static [&'static str],
    pub date: &'static [&'static str],
    pub numbers: &'static [&'static str],
}

impl FieldMap {
    /// Aliases for rows from the projected query.
    pub const PRIMARY: FieldMap = FieldMap {
        draw_number: &["drawNumber", "draw_number", "draw"],
        date: &["date", "draw_date"],
        numbers: &["numbers", "winning_numbers"],
    };

    /// Aliases for rows from the `SELECT *` fallback, where any column of the
    /// table may show up.
    pub const EXTENDED: FieldMap = FieldMap {
        draw_number: &["drawNumber", "draw_number", "draw", "id"],
        date: &["date", "draw_date", "created_at"],
        numbers: &["numbers", "winning_numbers", "nums"],
    };

    pub fn aliases(&self, field: Field) -> &'static [&'static str] {
        match field {
            Field::DrawNumber => self.draw_number,
            Field::Date => self.date,
            Field::Numbers => self.numbers,
        }
    }

    /// The value of the first alias of `field` that is populated in `row`.
    pub fn resolve<'r>(&self, row: &'r RawRow, field: Field) -> Option<&'r Value> {
        self.aliases(field)
            .iter()
            .filter_map(|alias| row.get(*alias))
            .find(|value| is_populated(value))
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Normalise one row.
pub fn normalize_row(row: &RawRow, map: &FieldMap) -> DrawResult {
    DrawResult {
        draw_number: resolve_text(row, map, Field::DrawNumber, NO_DRAW_NUMBER),
        date: resolve_text(row, map, Field::Date, NO_DATE),
        numbers: parse_numbers(map.resolve(row, Field::Numbers)),
    }
}

/// Normalise a row set, keeping storage order.
pub fn normalize_rows(rows: &[RawRow], map: &FieldMap) -> Vec<DrawResult> {
    rows.iter().map(|row| normalize_row(row, map)).collect()
}

fn resolve_text(row: &RawRow, map: &FieldMap, field: Field, default: &str) -> String {
    map.resolve(row, field)
        .map(coerce_to_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// A value counts as present unless it is null, `false`, zero, or an empty
/// string. Empty arrays and objects are present.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a field value as text. Integral numbers print without a fractional
/// part, so a `REAL` column holding `6907.0` reads as `"6907"`.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
                        format!("{}", f as i64)
                    }
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Number decoding
// ---------------------------------------------------------------------------

/// Decode a raw numbers value.
///
/// - absent or falsy → `[]`
/// - array → returned as-is
/// - string holding a JSON array → that array
/// - string holding other valid JSON → `[]`
/// - any other string → comma-split, each token read as a leading decimal
///   integer; tokens without one are dropped
/// - anything else → `[]`
pub fn parse_numbers(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) if !s.is_empty() => parse_encoded_numbers(s),
        _ => Vec::new(),
    }
}

fn parse_encoded_numbers(s: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Array(items)) => items,
        Ok(_) => Vec::new(),
        Err(_) => s
            .split(',')
            .filter_map(leading_integer)
            .map(Value::from)
            .collect(),
    }
}

/// Read an optional sign and the run of digits at the start of the trimmed
/// token. `"12abc"` → 12, `"abc"` → `None`. A `0x`/`0X` prefix switches to
/// hexadecimal, so `"0x1F"` → 31 and a bare `"0x"` → `None`. Values that
/// overflow `i64` are dropped.
pub fn leading_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let unsigned = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    let negative = token.starts_with('-');

    let (body, radix) = match unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (unsigned, 10),
    };
    let digits = body
        .find(|c: char| !c.is_digit(radix))
        .map_or(body, |end| &body[..end]);
    if digits.is_empty() {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
