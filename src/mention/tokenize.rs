//! Splitting text on mention tags and rebuilding it as segments.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Segment;

static AT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<at:(\d+)>").expect("mention tag pattern is valid"));

/// Text split around mention tags.
///
/// `texts` always holds one more fragment than `user_ids`: fragment `k` is the
/// text before tag `k`, the last fragment is whatever trails the last tag.
/// Fragments may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MentionSplit {
    pub texts: Vec<String>,
    pub user_ids: Vec<String>,
}

/// Split `text` on `<at:DIGITS>` tags. Tags with non-digit ids stay in the
/// text.
pub fn split_mentions(text: &str) -> MentionSplit {
    let mut split = MentionSplit::default();
    let mut last = 0;

    for caps in AT_TAG_RE.captures_iter(text) {
        let (Some(tag), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        split.texts.push(text[last..tag.start()].to_string());
        split.user_ids.push(id.as_str().to_string());
        last = tag.end();
    }
    split.texts.push(text[last..].to_string());

    split
}

/// Interleave text fragments and mentions back into segments, dropping empty
/// fragments.
///
/// Returns `None` unless there is exactly one more text fragment than ids.
pub fn rebuild_segments(split: &MentionSplit) -> Option<Vec<Segment>> {
    if split.texts.len() != split.user_ids.len() + 1 {
        return None;
    }

    let mut segments = Vec::with_capacity(split.texts.len() + split.user_ids.len());
    for (text, user_id) in split.texts.iter().zip(&split.user_ids) {
        if !text.is_empty() {
            segments.push(Segment::Text(text.clone()));
        }
        segments.push(Segment::At(user_id.clone()));
    }
    if let Some(trailing) = split.texts.last().filter(|t| !t.is_empty()) {
        segments.push(Segment::Text(trailing.clone()));
    }

    Some(segments)
}
