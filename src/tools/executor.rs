//! Tool executor for dispatching tool calls.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::error::{PluginError, Result};

use super::definitions::{Tool, ToolResult};

/// Dispatches tool calls by name
pub struct ToolExecutor {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolExecutor {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Function definitions of every tool exposed to the LLM
    pub fn definitions(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| tool.info())
            .filter(|info| info.available_for_llm)
            .map(|info| info.to_definition())
            .collect()
    }

    /// Execute a tool by name with the given JSON arguments
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<ToolResult> {
        debug!("Executing tool '{}' with args: {}", name, arguments);

        let Some(tool) = self.tools.iter().find(|t| t.info().name == name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(PluginError::UnknownTool(name.to_string()));
        };

        let args: Value = serde_json::from_str(arguments).unwrap_or_else(|e| {
            warn!("Malformed arguments for tool '{}': {}", name, e);
            Value::Null
        });
        Ok(tool.execute(&args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::tools::GetMemberInfoByNameTool;

    fn executor() -> ToolExecutor {
        ToolExecutor::new(vec![Arc::new(GetMemberInfoByNameTool::new(Arc::new(
            MemoryHost::new(),
        )))])
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let result = executor()
            .execute("get_member_info_by_name", r#"{"name": "nobody"}"#)
            .await
            .unwrap();
        assert_eq!(result.content, "未找到用户");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = executor().execute("web_search", "{}").await.unwrap_err();
        assert!(matches!(err, PluginError::UnknownTool(name) if name == "web_search"));
    }

    #[tokio::test]
    async fn malformed_arguments_resolve_to_not_found() {
        let result = executor()
            .execute("get_member_info_by_name", "{name")
            .await
            .unwrap();
        assert_eq!(result.content, "未找到用户");
    }

    #[test]
    fn lists_definitions() {
        let defs = executor().definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0]["function"]["name"], "get_member_info_by_name");
    }
}
