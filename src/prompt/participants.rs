//! Participant table building from chat history.

use std::collections::HashSet;

use crate::types::{ChatMessage, Participant};

/// Distinct senders of `messages` in first-seen order, skipping accounts for
/// which `is_bot_self(platform, user_id)` holds.
pub fn collect_participants<F>(messages: &[ChatMessage], is_bot_self: F) -> Vec<Participant>
where
    F: Fn(&str, &str) -> bool,
{
    let mut seen = HashSet::new();
    let mut participants = Vec::new();

    for message in messages {
        let user = &message.user_info;
        if is_bot_self(&user.platform, &user.user_id) {
            continue;
        }
        if !seen.insert(user.user_id.as_str()) {
            continue;
        }
        participants.push(Participant {
            display_name: user.user_nickname.clone(),
            user_id: user.user_id.clone(),
        });
    }

    participants
}
