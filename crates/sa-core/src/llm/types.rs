//! Messages API types
//!
//! Claude-style wire types plus conversions for OpenAI-compatible
//! endpoints.

use serde::{Deserialize, Serialize};

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<MessageContent>,
}

impl Message {
    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![MessageContent::Text { text: text.into() }],
        }
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: vec![MessageContent::Text { text: text.into() }],
        }
    }

    /// Get text content from message
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| {
                if let MessageContent::Text { text } = c {
                    Some(text.clone())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content block in a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

/// Tool definition for the Messages API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Messages API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Messages API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub response_type: String,
    pub role: String,
    pub content: Vec<MessageContent>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
    pub stop_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// ============================================================================
// OpenAI-compatible types (for GLM, etc.)
// ============================================================================

/// OpenAI-compatible chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    pub role: String,
    pub content: String,
}

impl OpenAiMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: text.into(),
        }
    }
}

impl From<&Message> for OpenAiMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.clone(),
            content: msg.text_content(),
        }
    }
}

/// OpenAI-compatible tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAiFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<&ToolDefinition> for OpenAiTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: OpenAiFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        }
    }
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiTool>>,
}

impl ChatCompletionRequest {
    /// Convert from a Claude-style request
    pub fn from_messages_request(req: &MessagesRequest) -> Self {
        let mut messages = Vec::new();

        if let Some(system) = &req.system {
            messages.push(OpenAiMessage::system(system));
        }

        for msg in &req.messages {
            messages.push(OpenAiMessage::from(msg));
        }

        let tools = req
            .tools
            .as_ref()
            .map(|t| t.iter().map(OpenAiTool::from).collect());

        Self {
            model: req.model.clone(),
            messages,
            max_tokens: Some(req.max_tokens),
            tools,
        }
    }
}

/// OpenAI-compatible chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<OpenAiUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessageResponse,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallResponse>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCallResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallResponse {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenAiUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ChatCompletionResponse {
    /// Convert to a Claude-style response
    pub fn to_messages_response(&self) -> MessagesResponse {
        let choice = self.choices.first();

        let content = match choice {
            Some(c) => {
                let mut content = Vec::new();

                if let Some(text) = &c.message.content {
                    if !text.is_empty() {
                        content.push(MessageContent::Text { text: text.clone() });
                    }
                }

                if let Some(tool_calls) = &c.message.tool_calls {
                    for tc in tool_calls {
                        let args: serde_json::Value =
                            serde_json::from_str(&tc.function.arguments)
                                .unwrap_or(serde_json::Value::Null);
                        content.push(MessageContent::ToolUse {
                            id: tc.id.clone(),
                            name: tc.function.name.clone(),
                            input: args,
                        });
                    }
                }

                content
            }
            None => vec![MessageContent::Text {
                text: String::new(),
            }],
        };

        let stop_reason = choice
            .map(|c| match c.finish_reason.as_str() {
                "stop" => "end_turn".to_string(),
                "tool_calls" => "tool_use".to_string(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "end_turn".to_string());

        MessagesResponse {
            id: self.id.clone(),
            response_type: "message".to_string(),
            role: "assistant".to_string(),
            content,
            model: self.model.clone(),
            stop_sequence: None,
            stop_reason,
            usage: self.usage.as_ref().map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_text_content() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.text_content(), "Hello");
    }

    #[test]
    fn test_message_content_serialization() {
        let msg = Message::assistant("Hi there");
        let serialized = serde_json::to_string(&msg).unwrap();
        assert!(serialized.contains(r#""type":"text""#));
        assert!(serialized.contains(r#""role":"assistant""#));
    }

    #[test]
    fn test_tool_use_roundtrip() {
        let content = MessageContent::ToolUse {
            id: "call_1".to_string(),
            name: "get_price".to_string(),
            input: json!({"symbol": "HBL"}),
        };
        let serialized = serde_json::to_string(&content).unwrap();
        let parsed: MessageContent = serde_json::from_str(&serialized).unwrap();
        match parsed {
            MessageContent::ToolUse { name, input, .. } => {
                assert_eq!(name, "get_price");
                assert_eq!(input["symbol"], "HBL");
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_openai_request_conversion() {
        let request = MessagesRequest {
            model: "glm-4.7".to_string(),
            max_tokens: 256,
            system: Some("be brief".to_string()),
            messages: vec![Message::user("What moved today?")],
            tools: Some(vec![ToolDefinition::new(
                "get_price",
                "price lookup",
                json!({"type": "object"}),
            )]),
        };

        let converted = ChatCompletionRequest::from_messages_request(&request);
        assert_eq!(converted.messages.len(), 2);
        assert_eq!(converted.messages[0].role, "system");
        assert_eq!(converted.messages[1].role, "user");
        assert_eq!(converted.tools.as_ref().unwrap().len(), 1);
        assert_eq!(converted.tools.as_ref().unwrap()[0].function.name, "get_price");
    }

    #[test]
    fn test_openai_response_conversion() {
        let response = ChatCompletionResponse {
            id: "chatcmpl-1".to_string(),
            object: "chat.completion".to_string(),
            created: 0,
            model: "glm-4.7".to_string(),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessageResponse {
                    role: "assistant".to_string(),
                    content: None,
                    tool_calls: Some(vec![ToolCallResponse {
                        id: "call_1".to_string(),
                        call_type: "function".to_string(),
                        function: FunctionCallResponse {
                            name: "get_company".to_string(),
                            arguments: r#"{"symbol":"TRG"}"#.to_string(),
                        },
                    }]),
                },
                finish_reason: "tool_calls".to_string(),
            }],
            usage: None,
        };

        let converted = response.to_messages_response();
        assert_eq!(converted.stop_reason, "tool_use");
        assert_eq!(converted.content.len(), 1);
        match &converted.content[0] {
            MessageContent::ToolUse { name, input, .. } => {
                assert_eq!(name, "get_company");
                assert_eq!(input["symbol"], "TRG");
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }
}
