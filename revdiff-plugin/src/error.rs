//! Error types for the plugin registry and its configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin not found: {0}")]
    UnknownPlugin(String),

    #[error("plugin already registered: {0}")]
    DuplicatePlugin(String),

    #[error("invalid setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    #[error("plugin '{plugin_id}' does not apply to field type '{field_type}'")]
    NotApplicable {
        plugin_id: String,
        field_type: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("settings lock poisoned")]
    Lock,
}
