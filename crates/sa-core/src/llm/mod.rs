//! LLM API client and wire types

pub mod client;
pub mod types;

pub use client::LlmClient;
pub use types::{Message, MessageContent, MessagesRequest, MessagesResponse, ToolDefinition, Usage};
