//! In-memory host, used for local runs and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use log::debug;

use crate::error::Result;
use crate::types::{ChatMessage, Person};

use super::{ChatHost, PersonRegistry};

#[derive(Debug, Clone)]
struct StoredMessage {
    message: ChatMessage,
    intercept_level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    bot_accounts: Vec<(String, String)>,
    messages: Vec<StoredMessage>,
    persons: Vec<Person>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bot_account(mut self, platform: &str, user_id: &str) -> Self {
        self.bot_accounts
            .push((platform.to_string(), user_id.to_string()));
        self
    }

    /// Store a message visible at intercept level 0.
    #[must_use]
    pub fn with_message(self, message: ChatMessage) -> Self {
        self.with_intercepted_message(message, 0)
    }

    #[must_use]
    pub fn with_intercepted_message(mut self, message: ChatMessage, intercept_level: u8) -> Self {
        self.messages.push(StoredMessage {
            message,
            intercept_level,
        });
        self
    }

    #[must_use]
    pub fn with_person(mut self, person: Person) -> Self {
        self.persons.push(person);
        self
    }

    fn find_exact(&self, name: &str) -> Option<&Person> {
        self.persons
            .iter()
            .find(|p| p.person_name.to_lowercase() == name.to_lowercase())
    }

    fn find_best_fuzzy(&self, name: &str) -> Option<&Person> {
        let matcher = SkimMatcherV2::default();
        let mut best: Option<(&Person, i64)> = None;

        for person in &self.persons {
            if let Some(score) = matcher.fuzzy_match(&person.person_name, name) {
                let is_better = best
                    .as_ref()
                    .is_none_or(|(_, best_score)| score > *best_score);

                if is_better {
                    debug!("New best match: {} (score: {score})", person.person_name);
                    best = Some((person, score));
                }
            }
        }

        best.map(|(person, _)| person)
    }
}

#[async_trait]
impl ChatHost for MemoryHost {
    async fn messages_before(
        &self,
        chat_id: &str,
        before: DateTime<Utc>,
        limit: usize,
        intercept_level: u8,
    ) -> Result<Vec<ChatMessage>> {
        let mut matching: Vec<&ChatMessage> = self
            .messages
            .iter()
            .filter(|m| m.intercept_level <= intercept_level)
            .map(|m| &m.message)
            .filter(|m| m.chat_id == chat_id && m.timestamp < before)
            .collect();

        matching.sort_by_key(|m| m.timestamp);
        let skip = matching.len().saturating_sub(limit);

        Ok(matching.into_iter().skip(skip).cloned().collect())
    }

    fn is_bot_self(&self, platform: &str, user_id: &str) -> bool {
        self.bot_accounts
            .iter()
            .any(|(p, id)| p == platform && id == user_id)
    }
}

#[async_trait]
impl PersonRegistry for MemoryHost {
    async fn person_id_by_name(&self, name: &str) -> Result<Option<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let found = self
            .find_exact(name)
            .or_else(|| self.find_best_fuzzy(name));

        Ok(found.map(|p| p.person_id.clone()))
    }

    async fn load_person(&self, person_id: &str) -> Result<Option<Person>> {
        Ok(self
            .persons
            .iter()
            .find(|p| p.person_id == person_id)
            .cloned())
    }
}
