//! Tool system
//!
//! Defines the trait for tools that the agent can invoke through
//! tool_use, and the manager that registers and executes them.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::ToolDefinition;
use crate::Result;

/// Tool execution result
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Output string from tool execution
    pub output: String,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: true,
        }
    }
}

/// Trait for tools invocable by the agent
///
/// Implementors provide a name, a description, a JSON schema for their
/// input, and the execution itself. A domain-level failure (unknown
/// symbol, no data) is an error `ToolResult`, not an `Err`; only
/// malformed input or infrastructure problems abort execution.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as exposed in tool definitions
    fn name(&self) -> &str;

    /// Description shown to the model when selecting tools
    fn description(&self) -> &str;

    /// JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Execute the tool with the given input
    async fn execute(&self, input: JsonValue) -> Result<ToolResult>;
}

/// Manager for registered tools
pub struct ToolManager {
    /// Registered tools indexed by name
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolManager {
    /// Create a new empty tool manager
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool, replacing any previous tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get definitions for all registered tools
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Execute a tool by name
    ///
    /// # Errors
    /// Returns an error if the tool is not registered or execution fails
    pub async fn execute(&self, name: &str, input: JsonValue) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| crate::Error::ToolExecution(format!("Unknown tool: {}", name)))?;
        tool.execute(input).await
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn input_schema(&self) -> JsonValue {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn execute(&self, input: JsonValue) -> Result<ToolResult> {
            Ok(ToolResult::success(
                input["text"].as_str().unwrap_or_default(),
            ))
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(EchoTool));

        assert_eq!(manager.len(), 1);
        assert!(manager.get("echo").is_some());

        let result = manager.execute("echo", json!({"text": "hi"})).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.output, "hi");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let manager = ToolManager::new();
        let result = manager.execute("missing", json!({})).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_definitions() {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(EchoTool));

        let defs = manager.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }
}
