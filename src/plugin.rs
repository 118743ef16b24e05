//! The plugin value the host loads: component registry and dispatch.

use std::sync::Arc;

use log::{debug, info};
use serde_json::Value;

use crate::config::Config;
use crate::error::{PluginError, Result};
use crate::handler::{EventHandler, HandlerInfo};
use crate::host::{ChatHost, PersonRegistry};
use crate::mention::PostAtHandler;
use crate::prompt::LlmAtHandler;
use crate::tools::{GetMemberInfoByNameTool, ToolExecutor, ToolInfo, ToolResult};
use crate::types::PluginEvent;

/// A component registered with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentInfo {
    EventHandler(HandlerInfo),
    Tool(ToolInfo),
}

pub struct AtPlugin {
    config: Config,
    handlers: Vec<Arc<dyn EventHandler>>,
    tools: ToolExecutor,
}

impl AtPlugin {
    pub fn new(
        config: Config,
        host: Arc<dyn ChatHost>,
        registry: Arc<dyn PersonRegistry>,
    ) -> Self {
        let mut handlers: Vec<Arc<dyn EventHandler>> = vec![
            Arc::new(LlmAtHandler::new(&config, host)),
            Arc::new(PostAtHandler),
        ];
        handlers.sort_by_key(|h| std::cmp::Reverse(h.info().weight));

        let tools = ToolExecutor::new(vec![Arc::new(GetMemberInfoByNameTool::new(registry))]);

        info!(
            "Loaded plugin {} v{} (enabled: {})",
            config.plugin.name, config.plugin.version, config.plugin.enabled
        );

        Self {
            config,
            handlers,
            tools,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.plugin.enabled
    }

    /// Components to register; nothing when the plugin is disabled.
    pub fn components(&self) -> Vec<ComponentInfo> {
        if !self.is_enabled() {
            return Vec::new();
        }

        self.handlers
            .iter()
            .map(|h| ComponentInfo::EventHandler(h.info()))
            .chain(
                self.tools
                    .tools()
                    .iter()
                    .map(|t| ComponentInfo::Tool(t.info())),
            )
            .collect()
    }

    /// Run every handler hooked on the event's type, highest weight first.
    pub async fn dispatch(&self, mut event: PluginEvent) -> PluginEvent {
        if !self.is_enabled() {
            return event;
        }

        for handler in &self.handlers {
            let handler_info = handler.info();
            if handler_info.event_type != event.event_type {
                continue;
            }

            debug!("Running handler {}", handler_info.name);
            let outcome = handler.execute(Some(&event)).await;
            if let Some(modified) = outcome.modified_event {
                event = modified;
            }
            if !outcome.continue_processing {
                debug!("Handler {} stopped the chain", handler_info.name);
                break;
            }
        }

        event
    }

    pub fn tool_definitions(&self) -> Vec<Value> {
        if !self.is_enabled() {
            return Vec::new();
        }
        self.tools.definitions()
    }

    pub async fn call_tool(&self, name: &str, arguments: &str) -> Result<ToolResult> {
        if !self.is_enabled() {
            return Err(PluginError::Disabled);
        }
        self.tools.execute(name, arguments).await
    }
}
