//! Conversation context assembly
//!
//! Builds the bounded prompt window handed to the agent from stored
//! history plus the new utterance. Output size is proportional to the
//! window, not to total history, so prompts stay bounded as
//! conversations grow.

use crate::session::{SessionManager, StoredMessage};
use crate::Result;

/// Default number of recent messages included in the prompt
pub const DEFAULT_CONTEXT_WINDOW: usize = 20;

/// Assembles the conversation window passed to the agent
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    window: usize,
}

impl ContextAssembler {
    /// Create an assembler with the given window size
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Build the prompt for a turn
    ///
    /// Fetches the most recent messages oldest-first, renders each as a
    /// `User:`/`Assistant:` line, and appends the new utterance as the
    /// final `User:` line. Read-only and deterministic for a given
    /// stored history.
    pub async fn build(
        &self,
        sessions: &SessionManager,
        session_id: &str,
        new_utterance: &str,
    ) -> Result<String> {
        let messages = sessions.recent_messages(session_id, self.window).await?;
        Ok(render(&messages, new_utterance))
    }

    /// The configured window size
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

fn render(messages: &[StoredMessage], new_utterance: &str) -> String {
    let mut lines: Vec<String> = messages
        .iter()
        .map(|m| format!("{}: {}", m.role.display_label(), m.content))
        .collect();
    lines.push(format!("User: {}", new_utterance));
    lines.join("\n")
}
