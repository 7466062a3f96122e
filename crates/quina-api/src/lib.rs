//! quina-api — HTTP surface for quina.
//!
//! Two JSON routes over any [`RowSource`](quina_core::RowSource), CORS for
//! browser clients, and the static web client served from a directory for
//! every other path.
//!
//! | Route              | Success                                   | Failure |
//! |--------------------|-------------------------------------------|---------|
//! | `GET /api/results` | `{latest, previous, lastUpdated}`          | 500 `{error, message}` |
//! | `GET /health`      | `{"status":"ok","database":"connected"}`  | 500 `{status, database, error}` |

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::HealthStatus;
pub use server::{cors_layer, router, run, serve};
pub use state::AppState;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
