//! Session lifecycle management
//!
//! Wraps the store behind a mutex and owns the acquire semantics used
//! by the turn orchestrator: create on missing id, reject an explicit
//! id that does not exist, and transparently replace an expired session
//! with a fresh one.

use std::sync::{Arc, Mutex};
use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::session::{Role, Session, SessionPatch, SessionSeed, SessionStore, StoredMessage};
use crate::{Error, Result};

/// Session manager that handles session lifecycle
pub struct SessionManager {
    /// Persistent storage (wrapped in Mutex for thread safety)
    store: Arc<Mutex<SessionStore>>,
}

impl SessionManager {
    /// Create a new session manager with a database path and TTL
    pub fn new(db_path: &str, ttl_secs: i64) -> Result<Self> {
        let store = SessionStore::new(db_path, ttl_secs)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Create an in-memory session manager (for testing)
    pub fn in_memory() -> Result<Self> {
        let store = SessionStore::in_memory()?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Create an in-memory session manager with a custom TTL (for testing)
    pub fn in_memory_with_ttl(ttl_secs: i64) -> Result<Self> {
        let store = SessionStore::in_memory_with_ttl(ttl_secs)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Acquire the session for a turn
    ///
    /// With no id, a new session is created. An explicit id that does
    /// not exist is an error; sessions are never fabricated for ids
    /// the caller made up. An explicit id whose session has expired is
    /// cascade-deleted and silently replaced by a brand-new session;
    /// the caller should use the returned id from then on.
    pub async fn acquire(&self, session_id: Option<&str>) -> Result<Session> {
        let mut store = self.store.lock().unwrap();

        let session = match session_id {
            Some(id) => {
                let Some(existing) = store.get(id)? else {
                    debug!("Session not found: {}", id);
                    return Err(Error::SessionNotFound(id.to_string()));
                };
                if existing.is_expired(Utc::now()) {
                    info!("Session {} expired, replacing with a new one", id);
                    store.delete(id)?;
                    store.create(SessionSeed::default())?
                } else {
                    existing
                }
            }
            None => store.create(SessionSeed::default())?,
        };

        store.touch(&session.id)?;
        Ok(session)
    }

    /// Load a session by id
    pub async fn get(&self, id: &str) -> Result<Option<Session>> {
        let store = self.store.lock().unwrap();
        store.get(id)
    }

    /// Renew a session's TTL
    pub async fn touch(&self, id: &str) -> Result<()> {
        let store = self.store.lock().unwrap();
        store.touch(id)
    }

    /// Apply a partial field update, renewing the TTL
    pub async fn update_fields(&self, id: &str, patch: SessionPatch) -> Result<Option<Session>> {
        let store = self.store.lock().unwrap();
        store.update_fields(id, patch)
    }

    /// Delete a session and its messages
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.delete(id)
    }

    /// Append a message to a session
    pub async fn add_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
        metadata: Option<&JsonValue>,
    ) -> Result<()> {
        let store = self.store.lock().unwrap();
        store.add_message(session_id, role, content, metadata)
    }

    /// Fetch up to `limit` most recent messages, oldest first
    pub async fn recent_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>> {
        let store = self.store.lock().unwrap();
        store.recent_messages(session_id, limit)
    }

    /// Count messages belonging to a session
    pub async fn message_count(&self, session_id: &str) -> Result<usize> {
        let store = self.store.lock().unwrap();
        store.count_messages(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_without_id_creates() {
        let manager = SessionManager::in_memory().unwrap();

        let session = manager.acquire(None).await.unwrap();
        assert!(!session.id.is_empty());
        assert!(manager.get(&session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_acquire_unknown_id_is_an_error() {
        let manager = SessionManager::in_memory().unwrap();

        let result = manager.acquire(Some("made-up-id")).await;
        assert!(matches!(result, Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_acquire_existing_returns_same_session() {
        let manager = SessionManager::in_memory().unwrap();

        let first = manager.acquire(None).await.unwrap();
        let second = manager.acquire(Some(&first.id)).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_acquire_expired_replaces_session() {
        let manager = SessionManager::in_memory_with_ttl(-1).unwrap();

        let stale = manager.acquire(None).await.unwrap();
        manager
            .add_message(&stale.id, Role::User, "old message", None)
            .await
            .unwrap();

        let fresh = manager.acquire(Some(&stale.id)).await.unwrap();
        assert_ne!(fresh.id, stale.id);

        // The stale session and its messages are gone.
        assert!(manager.get(&stale.id).await.unwrap().is_none());
        assert!(manager
            .recent_messages(&stale.id, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_acquire_touches() {
        let manager = SessionManager::in_memory().unwrap();

        let session = manager.acquire(None).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        manager.acquire(Some(&session.id)).await.unwrap();

        let touched = manager.get(&session.id).await.unwrap().unwrap();
        assert!(touched.expires_at > session.expires_at);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let manager = SessionManager::in_memory().unwrap();

        let session = manager.acquire(None).await.unwrap();
        manager.delete(&session.id).await.unwrap();
        assert!(manager.get(&session.id).await.unwrap().is_none());
    }
}
