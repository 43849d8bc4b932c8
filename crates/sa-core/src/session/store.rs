//! Session persistence using SQLite

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::session::{Role, Session, SessionPatch, SessionSeed, StoredMessage};
use crate::Result;

/// Default session time-to-live: 24 hours
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

/// SQLite-based session store
///
/// Owns the durable representation of sessions and their messages. All
/// mutation goes through here, and every mutating operation renews the
/// parent session's TTL.
pub struct SessionStore {
    conn: Connection,
    ttl: Duration,
}

impl SessionStore {
    /// Create a new session store with the given database path
    pub fn new(db_path: &str, ttl_secs: i64) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn,
            ttl: Duration::seconds(ttl_secs),
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory session store (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::in_memory_with_ttl(DEFAULT_TTL_SECS)
    }

    /// Create an in-memory session store with a custom TTL (for testing)
    pub fn in_memory_with_ttl(ttl_secs: i64) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            ttl: Duration::seconds(ttl_secs),
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                last_active_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                active_symbol TEXT,
                referenced_symbols TEXT NOT NULL,
                last_op TEXT,
                summary TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                metadata TEXT,
                ts TEXT NOT NULL
            )",
            [],
        )?;

        // Index for recent-message queries
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_session_ts ON messages(session_id, ts)",
            [],
        )?;

        Ok(())
    }

    /// Create a new session with a fresh id and TTL
    pub fn create(&self, seed: SessionSeed) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            last_active_at: now,
            expires_at: now + self.ttl,
            active_symbol: seed.active_symbol,
            referenced_symbols: seed.referenced_symbols,
            last_op: seed.last_op,
            summary: seed.summary,
        };

        let refs_json = serde_json::to_string(&session.referenced_symbols)?;
        self.conn.execute(
            "INSERT INTO sessions (id, created_at, last_active_at, expires_at,
                                   active_symbol, referenced_symbols, last_op, summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.id,
                session.created_at.to_rfc3339(),
                session.last_active_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
                session.active_symbol,
                refs_json,
                session.last_op,
                session.summary,
            ],
        )?;

        debug!("Created session: {}", session.id);
        Ok(session)
    }

    /// Load a session by ID
    ///
    /// Pure lookup; does not renew the TTL.
    pub fn get(&self, id: &str) -> Result<Option<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, last_active_at, expires_at,
                    active_symbol, referenced_symbols, last_op, summary
             FROM sessions WHERE id = ?1",
        )?;

        let session = stmt
            .query_row(params![id], |row| {
                let refs_json: String = row.get(5)?;
                let referenced_symbols: Vec<String> = serde_json::from_str(&refs_json)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?;

                Ok(Session {
                    id: row.get(0)?,
                    created_at: parse_ts(&row.get::<_, String>(1)?)?,
                    last_active_at: parse_ts(&row.get::<_, String>(2)?)?,
                    expires_at: parse_ts(&row.get::<_, String>(3)?)?,
                    active_symbol: row.get(4)?,
                    referenced_symbols,
                    last_op: row.get(6)?,
                    summary: row.get(7)?,
                })
            })
            .optional()?;

        Ok(session)
    }

    /// Renew the session's activity and expiry timestamps
    ///
    /// No-op if the session does not exist.
    pub fn touch(&self, id: &str) -> Result<()> {
        let now = Utc::now();
        self.conn.execute(
            "UPDATE sessions SET last_active_at = ?1, expires_at = ?2 WHERE id = ?3",
            params![now.to_rfc3339(), (now + self.ttl).to_rfc3339(), id],
        )?;
        Ok(())
    }

    /// Merge the supplied fields over the current record and persist
    ///
    /// Unspecified fields keep their prior values. Renews the TTL as
    /// part of the same operation and returns the updated session, or
    /// `None` if the session does not exist.
    pub fn update_fields(&self, id: &str, patch: SessionPatch) -> Result<Option<Session>> {
        let Some(current) = self.get(id)? else {
            return Ok(None);
        };

        let active_symbol = patch.active_symbol.unwrap_or(current.active_symbol);
        let referenced_symbols = patch
            .referenced_symbols
            .unwrap_or(current.referenced_symbols);
        let last_op = patch.last_op.unwrap_or(current.last_op);
        let summary = patch.summary.unwrap_or(current.summary);

        let refs_json = serde_json::to_string(&referenced_symbols)?;
        self.conn.execute(
            "UPDATE sessions SET active_symbol = ?1, referenced_symbols = ?2,
                                 last_op = ?3, summary = ?4
             WHERE id = ?5",
            params![active_symbol, refs_json, last_op, summary, id],
        )?;

        self.touch(id)?;
        self.get(id)
    }

    /// Delete a session and all of its messages as one atomic unit
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM messages WHERE session_id = ?1", params![id])?;
        tx.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        tx.commit()?;
        debug!("Deleted session: {}", id);
        Ok(())
    }

    /// Append a message to a session, renewing the session's TTL
    pub fn add_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
        metadata: Option<&JsonValue>,
    ) -> Result<()> {
        let metadata_json = metadata.map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT INTO messages (session_id, role, content, metadata, ts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id,
                role.as_str(),
                content,
                metadata_json,
                Utc::now().to_rfc3339(),
            ],
        )?;
        self.touch(session_id)?;
        Ok(())
    }

    /// Return up to `limit` most recent messages, oldest first
    pub fn recent_messages(&self, session_id: &str, limit: usize) -> Result<Vec<StoredMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role, content, metadata, ts FROM messages
             WHERE session_id = ?1
             ORDER BY ts DESC, id DESC
             LIMIT ?2",
        )?;

        let mut messages = stmt
            .query_map(params![session_id, limit as i64], |row| {
                let role_str: String = row.get(1)?;
                let role = Role::parse(&role_str).ok_or(rusqlite::Error::InvalidQuery)?;

                let metadata: Option<JsonValue> = match row.get::<_, Option<String>>(3)? {
                    Some(raw) => Some(
                        serde_json::from_str(&raw).map_err(|_| rusqlite::Error::InvalidQuery)?,
                    ),
                    None => None,
                };

                Ok(StoredMessage {
                    id: row.get(0)?,
                    role,
                    content: row.get(2)?,
                    metadata,
                    ts: parse_ts(&row.get::<_, String>(4)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        messages.reverse();
        Ok(messages)
    }

    /// Count messages belonging to a session
    pub fn count_messages(&self, session_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Check whether a session is expired
    ///
    /// An absent session counts as expired.
    pub fn is_expired(&self, session: Option<&Session>) -> bool {
        match session {
            Some(s) => s.is_expired(Utc::now()),
            None => true,
        }
    }
}

fn parse_ts(raw: &str) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidQuery)
}
