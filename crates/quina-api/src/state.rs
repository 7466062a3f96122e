//! Shared handler state.

use quina_core::{DrawRules, RowSource};
use std::sync::Arc;

/// State handed to every route. Cloning is cheap: the source is shared.
pub struct AppState<S> {
    pub source: Arc<S>,
    /// Rows requested per `/api/results` call.
    pub result_limit: usize,
    /// Served draws are checked against these and violations logged.
    pub rules: DrawRules,
}

impl<S: RowSource> AppState<S> {
    pub fn new(source: S, result_limit: usize) -> Self {
        Self::from_shared(Arc::new(source), result_limit)
    }

    /// Build state around a source the caller keeps a handle to.
    pub fn from_shared(source: Arc<S>, result_limit: usize) -> Self {
        Self {
            source,
            result_limit,
            rules: DrawRules::QUINA,
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            result_limit: self.result_limit,
            rules: self.rules,
        }
    }
}
