//! Session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Represents one ongoing conversation
///
/// A session tracks when it was last active, when it expires, and which
/// ticker symbols the conversation has been about. The active symbol is
/// the current subject and is used to resolve pronouns ("what about
/// it?"); `referenced_symbols` keeps every symbol mentioned so far in
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Session creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp, updated on every touch
    pub last_active_at: DateTime<Utc>,
    /// Expiry timestamp, recomputed on every touch
    pub expires_at: DateTime<Utc>,
    /// Ticker symbol the conversation is currently about
    pub active_symbol: Option<String>,
    /// All symbols referenced so far, insertion order, no duplicates
    pub referenced_symbols: Vec<String>,
    /// Free-form tag for the last operation
    pub last_op: Option<String>,
    /// Reserved for future history compaction
    pub summary: Option<String>,
}

impl Session {
    /// Check whether the session has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Initial field values for session creation
#[derive(Debug, Clone, Default)]
pub struct SessionSeed {
    pub active_symbol: Option<String>,
    pub referenced_symbols: Vec<String>,
    pub last_op: Option<String>,
    pub summary: Option<String>,
}

/// Partial update of session fields
///
/// Outer `None` means "leave the field as it is"; `Some(None)` clears an
/// optional field. Fields are never cleared implicitly.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub active_symbol: Option<Option<String>>,
    pub referenced_symbols: Option<Vec<String>>,
    pub last_op: Option<Option<String>>,
    pub summary: Option<Option<String>>,
}

impl SessionPatch {
    /// Patch that only sets the active symbol
    pub fn active_symbol(symbol: impl Into<String>) -> Self {
        Self {
            active_symbol: Some(Some(symbol.into())),
            ..Self::default()
        }
    }
}

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    /// Display label used when rendering conversation context
    pub fn display_label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A message persisted for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Sequence id, unique within the store
    pub id: i64,
    pub role: Role,
    /// Raw text for user messages, serialized output for assistant ones
    pub content: String,
    pub metadata: Option<JsonValue>,
    pub ts: DateTime<Utc>,
}
