//! Chat-bot plugin that lets the language model mention users.
//!
//! The model is told to write `<at:user_id>` tags, replies are rewritten so the
//! tags become mention segments, and `get_member_info_by_name` lets the model
//! look up ids it does not know yet.

pub mod config;
pub mod error;
pub mod handler;
pub mod host;
pub mod mention;
pub mod plugin;
pub mod prompt;
pub mod tools;
pub mod types;

pub use config::Config;
pub use error::{PluginError, Result};
pub use plugin::{AtPlugin, ComponentInfo};
