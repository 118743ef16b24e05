//! Handler that prepends mention instructions and the participant table to the LLM prompt.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

use crate::config::Config;
use crate::handler::{EventHandler, HandlerInfo};
use crate::host::ChatHost;
use crate::types::{EventType, HandlerOutcome, Participant, PluginEvent};

use super::participants::collect_participants;

/// Only history at this intercept level or below is scanned.
const INTERCEPT_LEVEL: u8 = 1;

const AT_PROMPT_HEADER: &str = "
你可以使用<at:user_id>的形式在消息中插入at
例如：
<at:12132344>你怎么还不起床
直接输出标签，不要使用 Markdown 链接或 @昵称
以下是昵称和user_id的映射表:
";

const AT_PROMPT_FOOTER: &str = "\n你*可以*在提及某个人时使用at来强调\n";

/// Instruction header, one `name:id` line per participant, closing line.
pub fn compose_at_prompt(participants: &[Participant]) -> String {
    let mut prompt = String::from(AT_PROMPT_HEADER);
    for participant in participants {
        let _ = writeln!(prompt, "{}:{}", participant.display_name, participant.user_id);
    }
    prompt.push_str(AT_PROMPT_FOOTER);
    prompt
}

pub struct LlmAtHandler {
    host: Arc<dyn ChatHost>,
    max_context_size: usize,
}

impl LlmAtHandler {
    pub const NAME: &'static str = "llm_at_handler";

    pub fn new(config: &Config, host: Arc<dyn ChatHost>) -> Self {
        Self {
            host,
            max_context_size: config.max_context_size,
        }
    }
}

#[async_trait]
impl EventHandler for LlmAtHandler {
    fn info(&self) -> HandlerInfo {
        HandlerInfo {
            name: Self::NAME,
            description: "Injects the <at:user_id> format into the LLM prompt",
            event_type: EventType::PostLlm,
            weight: 100,
            intercept_message: true,
        }
    }

    async fn execute(&self, event: Option<&PluginEvent>) -> HandlerOutcome {
        let Some(event) = event else {
            return HandlerOutcome::pass();
        };
        let (Some(prompt), Some(chat_id)) = (
            event.llm_prompt.as_deref().filter(|p| !p.is_empty()),
            event.stream_id.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return HandlerOutcome::pass();
        };

        let history = match self
            .host
            .messages_before(chat_id, Utc::now(), self.max_context_size, INTERCEPT_LEVEL)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!("Failed to fetch history for chat {chat_id}: {e}");
                return HandlerOutcome::pass();
            }
        };
        info!("Injecting ids of {} history messages", history.len());

        let participants =
            collect_participants(&history, |platform, id| self.host.is_bot_self(platform, id));
        debug!("Participant table has {} entries", participants.len());

        let mut modified = event.clone();
        modified.modify_llm_prompt(compose_at_prompt(&participants) + prompt, true);
        HandlerOutcome::modified(modified)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::error::{PluginError, Result};
    use crate::host::MemoryHost;
    use crate::types::{ChatMessage, UserInfo};

    struct FailingHost;

    #[async_trait]
    impl ChatHost for FailingHost {
        async fn messages_before(
            &self,
            _chat_id: &str,
            _before: chrono::DateTime<Utc>,
            _limit: usize,
            _intercept_level: u8,
        ) -> Result<Vec<ChatMessage>> {
            Err(PluginError::Host("database offline".to_string()))
        }

        fn is_bot_self(&self, _platform: &str, _user_id: &str) -> bool {
            false
        }
    }

    fn message(user_id: &str, nickname: &str, minutes_ago: i64) -> ChatMessage {
        ChatMessage {
            chat_id: "c1".to_string(),
            user_info: UserInfo {
                platform: "qq".to_string(),
                user_id: user_id.to_string(),
                user_nickname: nickname.to_string(),
            },
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            text: "hello".to_string(),
        }
    }

    fn participant(name: &str, id: &str) -> Participant {
        Participant {
            display_name: name.to_string(),
            user_id: id.to_string(),
        }
    }

    #[test]
    fn composes_header_table_and_footer() {
        let prompt =
            compose_at_prompt(&[participant("Alice", "1"), participant("Bob", "2")]) + "hi";

        assert!(prompt.starts_with(AT_PROMPT_HEADER));
        let alice = prompt.find("Alice:1\n").unwrap();
        let bob = prompt.find("Bob:2\n").unwrap();
        assert!(alice < bob);
        assert!(prompt.ends_with("你*可以*在提及某个人时使用at来强调\nhi"));
    }

    #[test]
    fn empty_table_still_has_instructions() {
        let prompt = compose_at_prompt(&[]);
        assert_eq!(prompt, format!("{AT_PROMPT_HEADER}{AT_PROMPT_FOOTER}"));
        assert!(prompt.contains("不要使用 Markdown 链接或 @昵称"));
    }

    #[tokio::test]
    async fn prepends_participants_from_history() {
        let host = MemoryHost::new()
            .with_bot_account("qq", "99")
            .with_message(message("1", "Alice", 5))
            .with_message(message("99", "Bot", 4))
            .with_message(message("2", "Bob", 3))
            .with_message(message("1", "Alice", 2));
        let handler = LlmAtHandler::new(&Config::default(), Arc::new(host));

        let event = PluginEvent::post_llm("c1", "hi");
        let outcome = handler.execute(Some(&event)).await;
        assert!(outcome.continue_processing);

        let modified = outcome.modified_event.unwrap();
        let expected = compose_at_prompt(&[participant("Alice", "1"), participant("Bob", "2")]) + "hi";
        assert_eq!(modified.llm_prompt.as_deref(), Some(expected.as_str()));
        assert!(!expected.contains("Bot:99"));
        assert!(modified.prompt_modified());
    }

    #[tokio::test]
    async fn respects_max_context_size() {
        let host = MemoryHost::new()
            .with_message(message("1", "Alice", 3))
            .with_message(message("2", "Bob", 2))
            .with_message(message("3", "Carol", 1));
        let config = Config {
            max_context_size: 2,
            ..Config::default()
        };
        let handler = LlmAtHandler::new(&config, Arc::new(host));

        let outcome = handler.execute(Some(&PluginEvent::post_llm("c1", "hi"))).await;
        let prompt = outcome.modified_event.unwrap().llm_prompt.unwrap();
        assert!(!prompt.contains("Alice:1"));
        assert!(prompt.contains("Bob:2\nCarol:3\n"));
    }

    #[tokio::test]
    async fn skips_without_prompt_or_stream() {
        let handler = LlmAtHandler::new(&Config::default(), Arc::new(MemoryHost::new()));

        let mut no_prompt = PluginEvent::post_llm("c1", "hi");
        no_prompt.llm_prompt = None;
        assert_eq!(handler.execute(Some(&no_prompt)).await, HandlerOutcome::pass());

        let mut no_stream = PluginEvent::post_llm("c1", "hi");
        no_stream.stream_id = None;
        assert_eq!(handler.execute(Some(&no_stream)).await, HandlerOutcome::pass());

        let empty_prompt = PluginEvent::post_llm("c1", "");
        assert_eq!(handler.execute(Some(&empty_prompt)).await, HandlerOutcome::pass());

        let empty_stream = PluginEvent::post_llm("", "hi");
        assert_eq!(handler.execute(Some(&empty_stream)).await, HandlerOutcome::pass());

        assert_eq!(handler.execute(None).await, HandlerOutcome::pass());
    }

    #[tokio::test]
    async fn host_failure_passes_through() {
        let handler = LlmAtHandler::new(&Config::default(), Arc::new(FailingHost));
        let outcome = handler.execute(Some(&PluginEvent::post_llm("c1", "hi"))).await;
        assert_eq!(outcome, HandlerOutcome::pass());
    }
}
