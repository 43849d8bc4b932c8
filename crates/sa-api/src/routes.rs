//! Route definitions

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{ask, delete_session, health, session_info};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Turn endpoint
        .route("/api/ask", post(ask))
        // Session management
        .route(
            "/api/session/{session_id}",
            get(session_info).delete(delete_session),
        )
}
