//! Mention tags in model output - `<at:user_id>` parsing and segment rewriting.

mod rewriter;
mod tokenize;

pub use rewriter::PostAtHandler;
pub use tokenize::{MentionSplit, rebuild_segments, split_mentions};
