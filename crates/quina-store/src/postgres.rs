//! PostgreSQL backend over a lazily connected sqlx pool.

use crate::bootstrap::{BootstrapReport, SAMPLE_DRAWS};
use crate::select_sql;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quina_core::types::iso_millis;
use rust_decimal::Decimal;
use quina_core::{BackendKind, QueryShape, RawRow, RowSource, StoreError};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    table: String,
}

/// Hosted Railway databases only accept TLS (with a self-signed chain);
/// everything else is reached in plain text.
pub fn ssl_mode_for(url: &str) -> PgSslMode {
    if url.contains("railway") {
        PgSslMode::Require
    } else {
        PgSslMode::Disable
    }
}

impl PgStore {
    /// Parse `url` and build a pool without connecting. Only a malformed URL
    /// fails here.
    pub fn connect_lazy(url: &str, table: impl Into<String>) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .ssl_mode(ssl_mode_for(url));
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy_with(options);
        let table = table.into();
        info!(%table, "using PostgreSQL store");
        Ok(Self { pool, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn bootstrap(&self) -> Result<BootstrapReport, StoreError> {
        let table = &self.table;
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id SERIAL PRIMARY KEY,
                draw_number INTEGER UNIQUE NOT NULL,
                date TEXT NOT NULL,
                numbers TEXT NOT NULL,
                created_at TIMESTAMPTZ DEFAULT now()
            )"
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, table))?;

        let insert = format!(
            "INSERT INTO {table} (draw_number, date, numbers) VALUES ($1, $2, $3) \
             ON CONFLICT (draw_number) DO NOTHING"
        );
        let mut inserted = 0;
        for draw in &SAMPLE_DRAWS {
            let done = sqlx::query(&insert)
                .bind(draw.draw_number as i32)
                .bind(draw.date)
                .bind(draw.encoded_numbers())
                .execute(&self.pool)
                .await
                .map_err(|e| classify(e, table))?;
            inserted += done.rows_affected() as usize;
        }

        Ok(BootstrapReport {
            backend: BackendKind::Postgres,
            table: table.clone(),
            inserted,
        })
    }
}

impl RowSource for PgStore {
    async fn fetch_recent_rows(
        &self,
        shape: QueryShape,
        limit: usize,
    ) -> Result<Vec<RawRow>, StoreError> {
        let sql = select_sql(shape, &self.table, "$1");
        debug!(%shape, table = %self.table, limit, "querying postgres");
        let rows = sqlx::query(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, &self.table))?;
        Ok(rows.iter().map(row_to_raw).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Postgres
    }
}

fn row_to_raw(row: &PgRow) -> RawRow {
    row.columns()
        .iter()
        .map(|col| {
            let value = column_value(row, col.ordinal(), col.type_info().name());
            (col.name().to_string(), value)
        })
        .collect()
}

/// Decode one column to JSON by its PostgreSQL type name. `NUMERIC` becomes
/// its decimal text; other unmapped types are read as text when sqlx accepts
/// that, otherwise null.
fn column_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    let decoded: Result<Value, sqlx::Error> = match type_name {
        "INT2" => row.try_get::<i16, _>(index).map(Value::from),
        "INT4" => row.try_get::<i32, _>(index).map(Value::from),
        "INT8" => row.try_get::<i64, _>(index).map(Value::from),
        "FLOAT4" => row.try_get::<f32, _>(index).map(|f| Value::from(f64::from(f))),
        "FLOAT8" => row.try_get::<f64, _>(index).map(Value::from),
        "BOOL" => row.try_get::<bool, _>(index).map(Value::from),
        "NUMERIC" => row.try_get::<Decimal, _>(index).map(numeric_value),
        "JSON" | "JSONB" => row.try_get::<Value, _>(index),
        "INT2[]" => row.try_get::<Vec<i16>, _>(index).map(Value::from),
        "INT4[]" => row.try_get::<Vec<i32>, _>(index).map(Value::from),
        "INT8[]" => row.try_get::<Vec<i64>, _>(index).map(Value::from),
        "TEXT[]" | "VARCHAR[]" => row.try_get::<Vec<String>, _>(index).map(Value::from),
        "DATE" => row
            .try_get::<NaiveDate, _>(index)
            .map(|d| Value::from(d.format("%Y-%m-%d").to_string())),
        "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(index)
            .map(|ts| Value::from(iso_millis(&ts.and_utc()))),
        "TIMESTAMPTZ" => row
            .try_get::<DateTime<Utc>, _>(index)
            .map(|ts| Value::from(iso_millis(&ts))),
        _ => row.try_get::<String, _>(index).map(Value::from),
    };

    decoded.unwrap_or(Value::Null)
}

/// `NUMERIC` keeps its declared scale: `6907` stays `"6907"`, a
/// `NUMERIC(8,2)` column gives `"6907.00"`.
fn numeric_value(value: Decimal) -> Value {
    Value::from(value.to_string())
}

fn classify(err: sqlx::Error, table: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42P01") => {
            StoreError::MissingTable(table.to_string())
        }
        sqlx::Error::Database(db) => StoreError::Query(db.message().to_string()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Configuration(_)
        | sqlx::Error::Protocol(_) => StoreError::Connection(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
