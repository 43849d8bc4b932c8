//! Session persistence and lifecycle

pub mod manager;
pub mod store;
pub mod types;

pub use manager::SessionManager;
pub use store::{SessionStore, DEFAULT_TTL_SECS};
pub use types::{Role, Session, SessionPatch, SessionSeed, StoredMessage};
