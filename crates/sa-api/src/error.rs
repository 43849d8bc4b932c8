//! API error mapping
//!
//! Maps core errors to the wire error contract: a machine-readable
//! code plus a human message, with the matching HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// sa-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] sa_core::Error),
}

/// Wire shape of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// Status code and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(sa_core::Error::InvalidQuestion(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_QUESTION")
            }
            ApiError::Core(sa_core::Error::SessionNotFound(_)) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
            }
            ApiError::Core(sa_core::Error::AgentUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "LLM_UNAVAILABLE")
            }
            ApiError::Core(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details are logged, not sent to the caller.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self);
            "Something went wrong".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

/// Result type alias for sa-api handlers
pub type Result<T> = std::result::Result<T, ApiError>;
