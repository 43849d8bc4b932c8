//! Turn orchestration
//!
//! Coordinates one request end to end: validate the question, acquire
//! the session, persist the user message, resolve the active symbol,
//! assemble the context, delegate to the agent, then persist and
//! return the structured output.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::ContextAssembler;
use crate::session::{Role, SessionManager};
use crate::symbol::SymbolResolver;
use crate::turn::output::{AssistantOutput, ConversationAgent};
use crate::turn::validate::validate_question;
use crate::{Error, Result};

/// One inbound turn request
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub question: String,
    pub session_id: Option<String>,
}

/// Result of a completed turn
#[derive(Debug, Clone)]
pub struct TurnResponse {
    /// Session id the caller should use for follow-up turns; differs
    /// from the supplied id when an expired session was replaced
    pub session_id: String,
    pub output: AssistantOutput,
}

/// Coordinates the components of a single turn
pub struct TurnOrchestrator {
    sessions: Arc<SessionManager>,
    resolver: SymbolResolver,
    assembler: ContextAssembler,
    agent: Arc<dyn ConversationAgent>,
}

impl TurnOrchestrator {
    /// Create an orchestrator with default resolver and context window
    pub fn new(sessions: Arc<SessionManager>, agent: Arc<dyn ConversationAgent>) -> Self {
        Self {
            sessions,
            resolver: SymbolResolver::new(),
            assembler: ContextAssembler::default(),
            agent,
        }
    }

    /// Override the context window size
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.assembler = ContextAssembler::new(window);
        self
    }

    /// Override the symbol resolver
    pub fn with_resolver(mut self, resolver: SymbolResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Handle one turn
    pub async fn handle(&self, request: TurnRequest) -> Result<TurnResponse> {
        let question = validate_question(&request.question)?;

        let session = self.sessions.acquire(request.session_id.as_deref()).await?;

        self.sessions
            .add_message(&session.id, Role::User, &question, None)
            .await?;

        let session = self
            .resolver
            .resolve_and_update(&self.sessions, session, &question)
            .await?;

        let context = self
            .assembler
            .build(&self.sessions, &session.id, &question)
            .await?;

        debug!("Invoking agent for session {}", session.id);
        let reply = match self.agent.run(&context).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Agent invocation failed for {}: {}", session.id, e);
                return Err(Error::AgentUnavailable(e.to_string()));
            }
        };

        let output = reply.into_output();
        self.persist_assistant_output(&session.id, &output).await?;

        Ok(TurnResponse {
            session_id: session.id,
            output,
        })
    }

    /// Store the assistant output and run the post-turn symbol update
    async fn persist_assistant_output(
        &self,
        session_id: &str,
        output: &AssistantOutput,
    ) -> Result<()> {
        let content = serde_json::to_string(output)?;
        self.sessions
            .add_message(session_id, Role::Assistant, &content, None)
            .await?;

        self.resolver
            .record_tool_symbol(&self.sessions, session_id, output)
            .await?;

        self.sessions.touch(session_id).await?;
        Ok(())
    }
}
