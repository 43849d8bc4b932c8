//! sa-core: Stock Assistant Gateway Core Library
//!
//! Session persistence with TTL expiry, conversation context assembly,
//! ticker symbol resolution, and the turn orchestrator that ties them
//! to the LLM agent boundary.

pub mod agent;
pub mod config;
pub mod context;
pub mod error;
pub mod llm;
pub mod session;
pub mod symbol;
pub mod tool;
pub mod turn;

pub use agent::StockAgent;
pub use config::{ApiConfig, Config, DatasetConfig, LlmConfig, LlmProvider, StoreConfig};
pub use context::ContextAssembler;
pub use error::{Error, Result};
pub use llm::{LlmClient, Message, MessageContent, ToolDefinition};
pub use session::{Role, Session, SessionManager, SessionPatch, SessionSeed, SessionStore};
pub use symbol::{SymbolExtractor, SymbolResolver, UppercaseRunExtractor};
pub use tool::{Tool, ToolManager, ToolResult};
pub use turn::{
    AgentReply, AssistantOutput, ConversationAgent, ToolInvocation, TurnOrchestrator, TurnRequest,
    TurnResponse,
};
