//! Tools the LLM can call through the host's function-calling loop

mod definitions;
mod executor;
mod member_info;

pub use definitions::{Tool, ToolInfo, ToolParam, ToolParamType, ToolResult};
pub use executor::ToolExecutor;
pub use member_info::GetMemberInfoByNameTool;
