//! HTTP server for quina: API routes, CORS, and the static web client.

use crate::routes;
use crate::state::AppState;
use anyhow::Result;
use axum::http::header::{HeaderName, ACCEPT, CONTENT_TYPE, ORIGIN};
use axum::Router;
use quina_core::config::ServerConfig;
use quina_core::RowSource;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Any origin may read the API; these are the request headers it accepts.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
        ])
}

/// The full application. Paths that are not API routes are looked up in
/// `static_dir`.
pub fn router<S: RowSource + 'static>(state: AppState<S>, static_dir: &Path) -> Router {
    Router::new()
        .merge(routes::results_routes())
        .merge(routes::health_routes())
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl-C.
pub async fn run<S: RowSource + 'static>(state: AppState<S>, config: &ServerConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state, config.static_dir.clone(), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<S, F>(
    listener: TcpListener,
    state: AppState<S>,
    static_dir: PathBuf,
    shutdown: F,
) -> Result<()>
where
    S: RowSource + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr()?.port();
    let app = router(state, &static_dir);

    info!("server running on http://localhost:{port}");
    info!("API endpoint: http://localhost:{port}/api/results");
    info!("health check: http://localhost:{port}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
