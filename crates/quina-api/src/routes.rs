//! API routes: `/api/results` and `/health`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use quina_core::{fetch_results, ResultsPage, RowSource};
use serde::Serialize;
use tracing::{debug, info};

// ============================================================================
// Results
// ============================================================================

pub fn results_routes<S: RowSource + 'static>() -> Router<AppState<S>> {
    Router::new().route("/api/results", get(results::<S>))
}

async fn results<S: RowSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<ResultsPage>, ApiError> {
    let results = fetch_results(state.source.as_ref(), state.result_limit).await?;

    for draw in &results {
        if let Err(violation) = draw.check(&state.rules) {
            debug!(draw = %draw.draw_number, %violation, "served draw does not match the draw rules");
        }
    }

    let page = ResultsPage::new(results, Utc::now());
    info!(
        latest = page.latest.as_ref().map(|d| d.draw_number.as_str()),
        previous = page.previous.len(),
        "served results"
    );
    Ok(Json(page))
}

// ============================================================================
// Health
// ============================================================================

/// Body of a successful `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

impl HealthStatus {
    pub const CONNECTED: HealthStatus = HealthStatus {
        status: "ok",
        database: "connected",
    };
}

pub fn health_routes<S: RowSource + 'static>() -> Router<AppState<S>> {
    Router::new().route("/health", get(health::<S>))
}

async fn health<S: RowSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<HealthStatus>, ApiError> {
    state.source.ping().await.map_err(ApiError::Disconnected)?;
    Ok(Json(HealthStatus::CONNECTED))
}
