//! Group member lookup tool implementation.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use crate::host::PersonRegistry;

use super::definitions::{Tool, ToolInfo, ToolParam, ToolParamType, ToolResult};

const NOT_FOUND: &str = "未找到用户";

/// Resolves a display name to a platform user id so the model can mention it.
pub struct GetMemberInfoByNameTool {
    registry: Arc<dyn PersonRegistry>,
}

impl GetMemberInfoByNameTool {
    pub const NAME: &'static str = "get_member_info_by_name";

    pub fn new(registry: Arc<dyn PersonRegistry>) -> Self {
        Self { registry }
    }

    async fn lookup_user_id(&self, name: &str) -> Option<String> {
        let person_id = match self.registry.person_id_by_name(name).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!("No user found for name {name}");
                return None;
            }
            Err(e) => {
                warn!("Person lookup for {name} failed: {e}");
                return None;
            }
        };

        match self.registry.load_person(&person_id).await {
            Ok(person) => person.and_then(|p| p.user_id),
            Err(e) => {
                warn!("Loading person {person_id} failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Tool for GetMemberInfoByNameTool {
    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: Self::NAME,
            description: "Get a group member's info, including the user_id used for mentions",
            parameters: vec![ToolParam {
                name: "name",
                param_type: ToolParamType::String,
                description: "Name of the group member to look up",
                required: true,
            }],
            available_for_llm: true,
        }
    }

    async fn execute(&self, args: &Value) -> ToolResult {
        let name = args.get("name").and_then(Value::as_str).unwrap_or("");
        debug!("Looking up member: {name}");

        match self.lookup_user_id(name).await {
            Some(user_id) => ToolResult::new(format!("用户{name}的id为{user_id}")),
            None => ToolResult::new(NOT_FOUND),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::{PluginError, Result};
    use crate::host::MemoryHost;
    use crate::types::Person;

    struct BrokenRegistry;

    #[async_trait]
    impl PersonRegistry for BrokenRegistry {
        async fn person_id_by_name(&self, _name: &str) -> Result<Option<String>> {
            Err(PluginError::Host("registry offline".to_string()))
        }

        async fn load_person(&self, _person_id: &str) -> Result<Option<Person>> {
            Ok(None)
        }
    }

    fn registry() -> Arc<MemoryHost> {
        Arc::new(
            MemoryHost::new()
                .with_person(Person {
                    person_id: "p1".to_string(),
                    person_name: "Alice".to_string(),
                    platform: "qq".to_string(),
                    user_id: Some("1".to_string()),
                })
                .with_person(Person {
                    person_id: "p2".to_string(),
                    person_name: "Ghost".to_string(),
                    platform: "qq".to_string(),
                    user_id: None,
                }),
        )
    }

    #[tokio::test]
    async fn resolves_known_name() {
        let tool = GetMemberInfoByNameTool::new(registry());
        let result = tool.execute(&json!({"name": "Alice"})).await;
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            json!({"content": "用户Alice的id为1"})
        );
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let tool = GetMemberInfoByNameTool::new(registry());
        let result = tool.execute(&json!({"name": "Zed"})).await;
        assert_eq!(result, ToolResult::new("未找到用户"));
    }

    #[tokio::test]
    async fn person_without_user_id_is_not_found() {
        let tool = GetMemberInfoByNameTool::new(registry());
        let result = tool.execute(&json!({"name": "Ghost"})).await;
        assert_eq!(result.content, "未找到用户");
    }

    #[tokio::test]
    async fn missing_name_is_not_found() {
        let tool = GetMemberInfoByNameTool::new(registry());
        assert_eq!(tool.execute(&json!({})).await.content, "未找到用户");
        assert_eq!(tool.execute(&json!({"name": 5})).await.content, "未找到用户");
    }

    #[tokio::test]
    async fn registry_errors_degrade_to_not_found() {
        let tool = GetMemberInfoByNameTool::new(Arc::new(BrokenRegistry));
        let result = tool.execute(&json!({"name": "Alice"})).await;
        assert_eq!(result.content, "未找到用户");
    }

    #[test]
    fn declares_required_name_param() {
        let info = GetMemberInfoByNameTool::new(registry()).info();
        assert_eq!(info.name, "get_member_info_by_name");
        assert!(info.available_for_llm);
        assert_eq!(info.parameters.len(), 1);
        assert!(info.parameters[0].required);
    }
}
