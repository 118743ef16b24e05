//! Common types shared by the handlers, the tool and the host traits.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hook point on the host event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Fired after the LLM prompt is built, before the model is called
    PostLlm,
    /// Fired before an outgoing message is handed to the platform adapter
    PostSendPreProcess,
}

/// Wire shape of a message segment: `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "type")]
    pub seg_type: String,
    pub data: Value,
}

/// One typed unit of an outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSegment", into = "RawSegment")]
pub enum Segment {
    /// Plain text
    Text(String),
    /// Mention of a platform user id
    At(String),
    /// Anything else (images, emoji, replies, non-string mention ids, ...),
    /// carried through untouched
    Other(RawSegment),
}

impl Segment {
    pub fn is_text(&self) -> bool {
        matches!(self, Segment::Text(_))
    }
}

impl From<RawSegment> for Segment {
    fn from(raw: RawSegment) -> Self {
        match (raw.seg_type.as_str(), &raw.data) {
            ("text", Value::String(text)) => Segment::Text(text.clone()),
            ("at", Value::String(id)) => Segment::At(id.clone()),
            _ => Segment::Other(raw),
        }
    }
}

impl From<Segment> for RawSegment {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Text(text) => RawSegment {
                seg_type: "text".to_string(),
                data: Value::String(text),
            },
            Segment::At(id) => RawSegment {
                seg_type: "at".to_string(),
                data: Value::String(id),
            },
            Segment::Other(raw) => raw,
        }
    }
}

/// Sender of a history message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub platform: String,
    pub user_id: String,
    pub user_nickname: String,
}

/// A message from the chat history, as returned by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub chat_id: String,
    pub user_info: UserInfo,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// A chat member the model may mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub display_name: String,
    pub user_id: String,
}

/// Person record from the host's person registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub person_id: String,
    pub person_name: String,
    pub platform: String,
    pub user_id: Option<String>,
}

/// In-flight event handed to the handlers by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginEvent {
    pub event_type: EventType,
    pub llm_prompt: Option<String>,
    pub stream_id: Option<String>,
    pub message_segments: Vec<Segment>,
    prompt_modified: bool,
    segments_forced: bool,
}

impl PluginEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            llm_prompt: None,
            stream_id: None,
            message_segments: Vec::new(),
            prompt_modified: false,
            segments_forced: false,
        }
    }

    /// Event fired before the model is called.
    pub fn post_llm(stream_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        let mut event = Self::new(EventType::PostLlm);
        event.stream_id = Some(stream_id.into());
        event.llm_prompt = Some(prompt.into());
        event
    }

    /// Event fired before a reply is sent.
    pub fn post_send(stream_id: impl Into<String>, segments: Vec<Segment>) -> Self {
        let mut event = Self::new(EventType::PostSendPreProcess);
        event.stream_id = Some(stream_id.into());
        event.message_segments = segments;
        event
    }

    /// Replaces the prompt. Overwriting a prompt someone else already
    /// modified is logged unless `suppress_warning` is set.
    pub fn modify_llm_prompt(&mut self, prompt: String, suppress_warning: bool) {
        if self.prompt_modified && !suppress_warning {
            warn!("LLM prompt was already modified by another handler; overwriting");
        }
        self.llm_prompt = Some(prompt);
        self.prompt_modified = true;
    }

    /// Replaces the segment list. `force` marks the replacement as
    /// authoritative over downstream defaults.
    pub fn modify_message_segments(&mut self, segments: Vec<Segment>, force: bool) {
        self.message_segments = segments;
        self.segments_forced = self.segments_forced || force;
    }

    pub fn prompt_modified(&self) -> bool {
        self.prompt_modified
    }

    pub fn segments_forced(&self) -> bool {
        self.segments_forced
    }
}

/// What a handler hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutcome {
    /// Whether later handlers on the same hook still run
    pub continue_processing: bool,
    pub success: bool,
    pub message: Option<String>,
    pub custom_result: Option<Value>,
    /// Replacement event, when the handler changed something
    pub modified_event: Option<PluginEvent>,
}

impl HandlerOutcome {
    /// Continue the chain without touching the event.
    pub fn pass() -> Self {
        Self {
            continue_processing: true,
            success: true,
            message: None,
            custom_result: None,
            modified_event: None,
        }
    }

    /// Continue the chain with a replacement event.
    pub fn modified(event: PluginEvent) -> Self {
        Self {
            modified_event: Some(event),
            ..Self::pass()
        }
    }
}
