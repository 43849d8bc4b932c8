//! Error types for sa-core

use thiserror::Error;

/// Main error type for sa-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Agent unavailable: {0}")]
    AgentUnavailable(String),

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sa-core
pub type Result<T> = std::result::Result<T, Error>;
