//! Handler errors and their JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quina_core::{FetchError, StoreError};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Both query shapes failed on `/api/results`.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The liveness probe on `/health` failed.
    #[error("database disconnected: {0}")]
    Disconnected(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Fetch(err) => {
                error!(error = %err, "database error");
                json!({
                    "error": "Failed to fetch results",
                    "message": err.to_string(),
                })
            }
            ApiError::Disconnected(err) => {
                error!(error = %err, "health check failed");
                json!({
                    "status": "error",
                    "database": "disconnected",
                    "error": err.to_string(),
                })
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
