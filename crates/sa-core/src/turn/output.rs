//! Agent boundary types
//!
//! The agent is an external collaborator: conversation text in, a
//! structured answer out. Its reply is modeled as an explicit sum type
//! because upstream may hand back either an already-structured value or
//! a JSON-encoded string that still needs decoding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::Result;

/// A tool invocation reported in the assistant output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, JsonValue>,
}

/// Structured output of one assistant turn (the wire shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantOutput {
    pub explanation: String,
    #[serde(default)]
    pub tool_used: Option<ToolInvocation>,
    #[serde(default)]
    pub data: Option<JsonValue>,
}

impl AssistantOutput {
    /// Output that carries only an explanation
    pub fn explanation_only(text: impl Into<String>) -> Self {
        Self {
            explanation: text.into(),
            tool_used: None,
            data: None,
        }
    }

    /// Symbol argument of the tool invocation, if any
    pub fn tool_symbol(&self) -> Option<&str> {
        self.tool_used.as_ref()?.args.get("symbol")?.as_str()
    }
}

/// Reply from the agent boundary
#[derive(Debug, Clone)]
pub enum AgentReply {
    /// Already matches the output shape
    Structured(AssistantOutput),
    /// Raw model text that may or may not be JSON
    Raw(String),
}

impl AgentReply {
    /// Decode into the output shape
    ///
    /// Raw text that is not a valid output object degrades to an
    /// explanation-only output instead of failing the turn.
    pub fn into_output(self) -> AssistantOutput {
        match self {
            AgentReply::Structured(output) => output,
            AgentReply::Raw(text) => match serde_json::from_str(&text) {
                Ok(output) => output,
                Err(_) => AssistantOutput::explanation_only(text),
            },
        }
    }
}

/// The external language-model-backed collaborator
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    /// Produce an answer for the assembled conversation context
    async fn run(&self, context: &str) -> Result<AgentReply>;
}
