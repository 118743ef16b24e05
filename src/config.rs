use std::env;

use log::{debug, error, info};

use crate::error::{PluginError, Result};

/// Number of history messages scanned for participants when unset.
pub const DEFAULT_MAX_CONTEXT_SIZE: usize = 18;

/// Name, version and enable flag declared by the plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    pub config_version: String,
    pub enabled: bool,
}

impl Default for PluginManifest {
    fn default() -> Self {
        Self {
            name: "at_plugin".to_string(),
            version: "1.0.0".to_string(),
            config_version: "1.0.0".to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub plugin: PluginManifest,
    pub max_context_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin: PluginManifest::default(),
            max_context_size: DEFAULT_MAX_CONTEXT_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("AT_PLUGIN_ENABLED") {
            config.plugin.enabled = parse_bool(&raw).ok_or_else(|| {
                error!("Invalid AT_PLUGIN_ENABLED value: {raw}");
                PluginError::Config(format!("AT_PLUGIN_ENABLED must be a boolean, got '{raw}'"))
            })?;
        }

        if let Some(raw) = lookup("AT_PLUGIN_CONFIG_VERSION") {
            config.plugin.config_version = raw;
        }

        if let Some(raw) = lookup("MAX_CONTEXT_SIZE") {
            config.max_context_size = raw.trim().parse().map_err(|e| {
                error!("Invalid MAX_CONTEXT_SIZE value: {raw}");
                PluginError::Config(format!("MAX_CONTEXT_SIZE must be an integer: {e}"))
            })?;
        }

        info!("Configuration loaded successfully");
        debug!(
            "Plugin {} v{} (config v{}), enabled: {}",
            config.plugin.name,
            config.plugin.version,
            config.plugin.config_version,
            config.plugin.enabled
        );
        debug!("Max context size: {}", config.max_context_size);

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
