//! Turn orchestration

pub mod orchestrator;
pub mod output;
pub mod validate;

pub use orchestrator::{TurnOrchestrator, TurnRequest, TurnResponse};
pub use output::{AgentReply, AssistantOutput, ConversationAgent, ToolInvocation};
pub use validate::validate_question;
