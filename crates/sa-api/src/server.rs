//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use sa_core::{SessionManager, TurnOrchestrator};

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TurnOrchestrator>,
    pub sessions: Arc<SessionManager>,
}

/// Start the HTTP API server
pub async fn start_server(
    port: u16,
    orchestrator: Arc<TurnOrchestrator>,
    sessions: Arc<SessionManager>,
) -> anyhow::Result<()> {
    let state = AppState {
        orchestrator,
        sessions,
    };

    let app = Router::new()
        .merge(routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
