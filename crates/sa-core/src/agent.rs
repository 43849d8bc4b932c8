//! LLM-backed conversation agent
//!
//! Implements the agent boundary on top of the Messages API client,
//! exposing the registered stock tools through tool_use and iterating
//! until the model produces its final answer.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::llm::{LlmClient, Message, MessageContent, MessagesRequest};
use crate::tool::{ToolManager, ToolResult};
use crate::turn::{AgentReply, AssistantOutput, ConversationAgent, ToolInvocation};
use crate::{Error, Result};

/// Instructions given to the model on every turn
const INSTRUCTIONS: &str = "You are a financial assistant.\n\
\n\
RULES:\n\
- You MUST always return a single JSON object with exactly these fields: explanation, toolUsed, data.\n\
- For general finance/stock questions that need no tool, return: {\"explanation\": \"...\", \"toolUsed\": null, \"data\": null}\n\
- For lookups, call the matching tool, include its output in explanation and data, and set toolUsed to {\"name\": \"...\", \"args\": {...}}.\n\
- Never return plain text or markdown.";

const DEFAULT_MAX_ITERATIONS: usize = 10;
const MAX_TOKENS: u64 = 1024;

/// Conversation agent backed by the LLM client and the stock tools
pub struct StockAgent {
    client: LlmClient,
    tools: Arc<ToolManager>,
    max_iterations: usize,
}

impl StockAgent {
    /// Create a new agent
    pub fn new(client: LlmClient, tools: Arc<ToolManager>) -> Self {
        Self {
            client,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the tool-use iteration limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run the tool-use loop until the model stops
    ///
    /// Returns the final model text plus the last tool invocation and
    /// its parsed output, when any tool was called.
    async fn run_loop(
        &self,
        context: &str,
    ) -> Result<(String, Option<ToolInvocation>, Option<JsonValue>)> {
        let mut messages = vec![Message::user(context)];
        let mut last_invocation: Option<ToolInvocation> = None;
        let mut last_data: Option<JsonValue> = None;
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                warn!("Agent loop hit iteration limit ({})", self.max_iterations);
                return Err(Error::Llm("Max iterations reached".to_string()));
            }

            let request = MessagesRequest {
                model: self.client.model().to_string(),
                max_tokens: MAX_TOKENS,
                system: Some(INSTRUCTIONS.to_string()),
                messages: messages.clone(),
                tools: Some(self.tools.definitions()),
            };

            let response = self.client.messages(request).await?;

            match response.stop_reason.as_str() {
                "end_turn" | "stop_sequence" | "stop" => {
                    let text = response
                        .content
                        .iter()
                        .filter_map(|c| {
                            if let MessageContent::Text { text } = c {
                                Some(text.clone())
                            } else {
                                None
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("\n");

                    return Ok((text, last_invocation, last_data));
                }
                "tool_use" | "tool_calls" => {
                    let tool_uses: Vec<_> = response
                        .content
                        .iter()
                        .filter_map(|c| {
                            if let MessageContent::ToolUse { id, name, input } = c {
                                Some((id.clone(), name.clone(), input.clone()))
                            } else {
                                None
                            }
                        })
                        .collect();

                    if tool_uses.is_empty() {
                        warn!("tool_use stop_reason but no tool_use content");
                        continue;
                    }

                    messages.push(Message {
                        role: "assistant".to_string(),
                        content: response.content.clone(),
                    });

                    let mut tool_results = Vec::new();
                    for (id, name, input) in &tool_uses {
                        debug!("Executing tool {} with input {:?}", name, input);
                        let result = match self.tools.execute(name, input.clone()).await {
                            Ok(result) => result,
                            Err(e) => ToolResult::error(format!("Tool execution error: {}", e)),
                        };

                        if !result.is_error {
                            last_invocation = Some(ToolInvocation {
                                name: name.clone(),
                                args: input.as_object().cloned().unwrap_or_default(),
                            });
                            last_data = serde_json::from_str(&result.output).ok();
                        }

                        tool_results.push(MessageContent::ToolResult {
                            tool_use_id: id.clone(),
                            content: result.output,
                            is_error: result.is_error,
                        });
                    }

                    messages.push(Message {
                        role: "user".to_string(),
                        content: tool_results,
                    });
                }
                other => {
                    warn!("Unknown stop_reason: {}", other);
                    return Err(Error::Llm(format!("Unknown stop_reason: {}", other)));
                }
            }
        }
    }
}

#[async_trait]
impl ConversationAgent for StockAgent {
    async fn run(&self, context: &str) -> Result<AgentReply> {
        let (text, tool_used, data) = self.run_loop(context).await?;
        Ok(shape_reply(text, tool_used, data))
    }
}

/// Shape the loop result into an agent reply
///
/// The model's own JSON wins when it is well formed; otherwise an
/// observed tool call lets us reconstruct the structured output, and
/// plain text is handed back raw for the orchestrator's fallback.
fn shape_reply(
    text: String,
    tool_used: Option<ToolInvocation>,
    data: Option<JsonValue>,
) -> AgentReply {
    if let Ok(output) = serde_json::from_str::<AssistantOutput>(&text) {
        return AgentReply::Structured(output);
    }

    if tool_used.is_some() {
        return AgentReply::Structured(AssistantOutput {
            explanation: text,
            tool_used,
            data,
        });
    }

    AgentReply::Raw(text)
}
