use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Plugin is disabled")]
    Disabled,
}

impl PluginError {
    /// Returns a user-friendly error message suitable for sending back to the chat
    pub fn user_message(&self) -> String {
        match self {
            PluginError::Config(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
            PluginError::Json(_) => {
                "Sorry, I received malformed data. Please try again.".to_string()
            }
            PluginError::Host(_) => {
                "Sorry, I couldn't reach the chat history right now. Please try again later.".to_string()
            }
            PluginError::UnknownTool(_) => {
                "Sorry, I tried to use a tool I don't have.".to_string()
            }
            PluginError::Disabled => {
                "Sorry, mentions are currently disabled.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;
