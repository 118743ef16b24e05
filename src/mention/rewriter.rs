//! Handler that turns `<at:ID>` tags in an outgoing reply into mention segments.

use async_trait::async_trait;
use log::{debug, error, info};

use crate::handler::{EventHandler, HandlerInfo};
use crate::types::{EventType, HandlerOutcome, PluginEvent, Segment};

use super::tokenize::{rebuild_segments, split_mentions};

pub struct PostAtHandler;

impl PostAtHandler {
    pub const NAME: &'static str = "post_at_handler";

    /// Rewrite `segments`, or `None` when there is nothing to rewrite.
    ///
    /// All text segments are merged, split on mention tags and rebuilt; the
    /// remaining segments follow in their original order.
    pub fn rewrite(segments: &[Segment]) -> Option<Vec<Segment>> {
        if !segments.iter().any(Segment::is_text) {
            info!("Non-text message, skipping");
            return None;
        }

        let raw_text: String = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();

        let split = split_mentions(&raw_text);
        if split.user_ids.is_empty() {
            info!("No mention tags found");
            return None;
        }

        let Some(mut rebuilt) = rebuild_segments(&split) else {
            error!(
                "Fragment count mismatch ({} texts, {} mentions), skipping",
                split.texts.len(),
                split.user_ids.len()
            );
            return None;
        };

        debug!("Rewrote {} mention tags", split.user_ids.len());
        rebuilt.extend(segments.iter().filter(|s| !s.is_text()).cloned());
        Some(rebuilt)
    }
}

#[async_trait]
impl EventHandler for PostAtHandler {
    fn info(&self) -> HandlerInfo {
        HandlerInfo {
            name: Self::NAME,
            description: "Converts <at:user_id> tags in model output into mention segments",
            event_type: EventType::PostSendPreProcess,
            weight: 100,
            intercept_message: true,
        }
    }

    async fn execute(&self, event: Option<&PluginEvent>) -> HandlerOutcome {
        let Some(event) = event else {
            return HandlerOutcome::pass();
        };

        let Some(segments) = Self::rewrite(&event.message_segments) else {
            return HandlerOutcome::pass();
        };

        let mut modified = event.clone();
        modified.modify_message_segments(segments, true);
        HandlerOutcome::modified(modified)
    }
}
