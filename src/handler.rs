//! Event handler contract used by the plugin's components.

use async_trait::async_trait;

use crate::types::{EventType, HandlerOutcome, PluginEvent};

/// Registration metadata for an event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub event_type: EventType,
    /// Higher weights run first
    pub weight: i32,
    pub intercept_message: bool,
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn info(&self) -> HandlerInfo;

    /// Handle one event. Never fails: problems are logged and the event is
    /// passed through.
    async fn execute(&self, event: Option<&PluginEvent>) -> HandlerOutcome;
}
