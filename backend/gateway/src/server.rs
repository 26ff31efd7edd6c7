//! Router assembly and the HTTP listener.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use textlens_media::upload_router;

use crate::completion_proxy::search_nemotron;
use crate::health_api::get_health;
use crate::state::GatewayState;
use crate::upload::upload_image;

/// Path prefix stored uploads are served under.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// All gateway routes. `max_upload_bytes` caps request bodies.
pub fn build_router(state: GatewayState, max_upload_bytes: usize) -> Router {
    let uploads = upload_router(state.uploads.clone());

    Router::new()
        .route("/upload", post(upload_image))
        .route("/search-nemotron", post(search_nemotron))
        .route("/api/health", get(get_health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .nest(UPLOADS_PREFIX, uploads)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve until Ctrl+C or SIGTERM.
#[instrument(skip(router))]
pub async fn start_server(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("textlens listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
