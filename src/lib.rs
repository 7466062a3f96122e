//! quina — Quina lottery results over HTTP.
//!
//! Reads stored draws from SQLite or PostgreSQL, reconciles the column naming
//! and number encodings they were written with, and serves them to a static
//! web page. The layers live in their own crates and are re-exported here for the
//! binary, integration tests and benches.
//!
//! # Architecture
//!
//! ```text
//! quina-store ──► quina-core ──► quina-api
//!  (rows)         (normalise,     (JSON routes,
//!                  fall back)      static client)
//! ```

pub mod check;

pub use quina_api as api;
pub use quina_store as store;

pub use quina_core::config::Config;
pub use quina_core::{DrawResult, ResultsPage};
