//! Services the plugin needs from the chat-bot host.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{ChatMessage, Person};

pub use memory::MemoryHost;

/// Chat history and bot identity.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Up to `limit` most recent messages of `chat_id` sent strictly before
    /// `before`, in chronological order, with intercept level at most
    /// `intercept_level`.
    async fn messages_before(
        &self,
        chat_id: &str,
        before: DateTime<Utc>,
        limit: usize,
        intercept_level: u8,
    ) -> Result<Vec<ChatMessage>>;

    /// Whether `user_id` on `platform` is the bot's own account.
    fn is_bot_self(&self, platform: &str, user_id: &str) -> bool;
}

/// Directory of known people.
#[async_trait]
pub trait PersonRegistry: Send + Sync {
    /// Resolve a display name to a person id. Matching rules belong to the host.
    async fn person_id_by_name(&self, name: &str) -> Result<Option<String>>;

    async fn load_person(&self, person_id: &str) -> Result<Option<Person>>;
}
