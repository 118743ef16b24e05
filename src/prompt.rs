//! Prompt annotation - teaches the model the mention tag syntax and who it can mention.

mod annotator;
mod participants;

pub use annotator::{LlmAtHandler, compose_at_prompt};
pub use participants::collect_participants;
