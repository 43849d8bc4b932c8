//! sa-api: HTTP surface for the stock assistant gateway
//!
//! Exposes the turn endpoint plus session info/delete over axum.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use server::{start_server, AppState};
