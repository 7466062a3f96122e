//! quina-core — draw result normalisation for quina.
//!
//! This crate owns everything that does not depend on a particular storage
//! engine or on HTTP: the canonical [`DrawResult`], the alias-table
//! normalizer, the [`RowSource`](source::RowSource) capability that backends
//! implement, the fetch/fallback policy, and configuration.
//!
//! # Architecture
//!
//! ```text
//! RowSource ──► raw rows ──► Normalizer ──► DrawResult ──► ResultsPage
//!  (store)                   (alias map)                   (re-sorted)
//! ```

pub mod config;
pub mod error;
pub mod normalizer;
pub mod source;
pub mod types;

pub use error::{FetchError, StoreError};
pub use normalizer::{normalize_row, normalize_rows, parse_numbers, Field, FieldMap};
pub use source::{fetch_results, BackendKind, QueryShape, RowSource};
pub use types::{DrawResult, DrawRules, DrawViolation, RawRow, ResultsPage};
