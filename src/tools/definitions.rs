//! Tool contract and the function-calling schema it produces.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolParamType {
    String,
}

impl ToolParamType {
    /// JSON schema type name
    pub fn as_str(self) -> &'static str {
        match self {
            ToolParamType::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParam {
    pub name: &'static str,
    pub param_type: ToolParamType,
    pub description: &'static str,
    pub required: bool,
}

/// Registration metadata for a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ToolParam>,
    pub available_for_llm: bool,
}

impl ToolInfo {
    /// Function definition in the shape the chat-completions API expects.
    pub fn to_definition(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let schema = json!({
                "type": param.param_type.as_str(),
                "description": param.description,
            });
            properties.insert(param.name.to_string(), schema);
            if param.required {
                required.push(param.name);
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}

/// Payload handed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub content: String,
}

impl ToolResult {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn info(&self) -> ToolInfo;

    async fn execute(&self, args: &Value) -> ToolResult;
}
