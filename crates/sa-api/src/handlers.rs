//! HTTP API handlers
//!
//! Request handlers for the turn endpoint and session management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sa_core::{AssistantOutput, TurnRequest};

use crate::error::{ApiError, Result};
use crate::server::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Turn endpoint request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// The user's question
    pub question: String,
    /// Session id for conversation continuity
    pub session_id: Option<String>,
}

/// Turn endpoint response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    /// Session id for follow-up requests; a fresh id when none was
    /// supplied or when an expired session was replaced
    pub session_id: String,
    pub output: AssistantOutput,
}

/// Session info response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfoResponse {
    pub session_id: String,
    pub created_at: String,
    pub last_active_at: String,
    pub expires_at: String,
    pub active_symbol: Option<String>,
    pub referenced_symbols: Vec<String>,
    pub message_count: usize,
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Turn endpoint - ask the stock assistant a question
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    debug!("Ask request, session_id={:?}", request.session_id);

    let response = state
        .orchestrator
        .handle(TurnRequest {
            question: request.question,
            session_id: request.session_id,
        })
        .await?;

    Ok(Json(AskResponse {
        session_id: response.session_id,
        output: response.output,
    }))
}

/// Get session metadata
pub async fn session_info(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfoResponse>> {
    let session = state
        .sessions
        .get(&session_id)
        .await?
        .ok_or_else(|| ApiError::from(sa_core::Error::SessionNotFound(session_id.clone())))?;

    let message_count = state.sessions.message_count(&session.id).await?;

    Ok(Json(SessionInfoResponse {
        session_id: session.id,
        created_at: session.created_at.to_rfc3339(),
        last_active_at: session.last_active_at.to_rfc3339(),
        expires_at: session.expires_at.to_rfc3339(),
        active_symbol: session.active_symbol,
        referenced_symbols: session.referenced_symbols,
        message_count,
    }))
}

/// Delete a session and its messages
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode> {
    info!("Deleting session: {}", session_id);
    state.sessions.delete(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
