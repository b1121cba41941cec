//! Diff settings, read from a TOML file.
//!
//! Loading never fails hard: a missing file means defaults, and a file that
//! cannot be read or parsed is reported with a warning and replaced by
//! defaults. Use [`DiffSettings::from_toml_str`] where errors must surface.

use crate::error::ConfigError;
use crate::field::StoredFieldPlugin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Client-side behaviour of the two revision radio columns. Passed through
/// to the presentation layer untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioBehavior {
    /// Any two revisions may be picked.
    #[default]
    Simple,
    /// Picks are constrained so the left side stays older than the right.
    Linear,
}

impl RadioBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Linear => "linear",
        }
    }
}

/// Saved enable/weight state of one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSetting {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub weight: i32,
}

impl PluginSetting {
    pub fn new(id: impl Into<String>, enabled: bool, weight: i32) -> Self {
        Self {
            id: id.into(),
            enabled,
            weight,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_pager_limit() -> usize {
    50
}

fn default_layout_plugins() -> Vec<PluginSetting> {
    vec![
        PluginSetting::new("split_fields", true, 0),
        PluginSetting::new("unified_fields", true, 1),
        PluginSetting::new("visual_inline", false, 2),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Revisions listed per overview page.
    #[serde(default = "default_pager_limit")]
    pub revision_pager_limit: usize,
    #[serde(default)]
    pub radio_behavior: RadioBehavior,
    /// Layout plugins in declaration order.
    #[serde(default = "default_layout_plugins")]
    pub layout_plugins: Vec<PluginSetting>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            revision_pager_limit: default_pager_limit(),
            radio_behavior: RadioBehavior::default(),
            layout_plugins: default_layout_plugins(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffSettings {
    #[serde(default)]
    pub general_settings: GeneralSettings,
    /// Field diff builder choice per field type.
    #[serde(default)]
    pub field_plugins: BTreeMap<String, StoredFieldPlugin>,
}

impl DiffSettings {
    /// Loads settings from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No diff settings found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(settings) => {
                    info!("Loaded diff settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!(
                        "Failed to parse diff settings {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read diff settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Loads settings from `path` for a caller that will write them back.
    ///
    /// A missing file still gives defaults, but read and parse failures are
    /// returned so the caller never overwrites a file it could not understand.
    pub fn load_strict(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No diff settings found at {:?}, starting from defaults", path);
            return Ok(Self::default());
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Page size for revision listings; never zero.
    pub fn revision_pager_limit(&self) -> usize {
        self.general_settings.revision_pager_limit.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = DiffSettings::from_toml_str("").unwrap();
        assert_eq!(settings, DiffSettings::default());
        assert_eq!(settings.revision_pager_limit(), 50);
        assert_eq!(settings.general_settings.radio_behavior, RadioBehavior::Simple);
    }

    #[test]
    fn parse_settings_toml() {
        let toml_str = r#"
[general_settings]
revision_pager_limit = 10
radio_behavior = "linear"

[[general_settings.layout_plugins]]
id = "unified_fields"
weight = -3

[[general_settings.layout_plugins]]
id = "split_fields"
enabled = false

[field_plugins.text_long]
type = "text_field_diff_builder"

[field_plugins.text_long.settings]
show_header = false
markdown = "filter_xss"
"#;
        let settings = DiffSettings::from_toml_str(toml_str).unwrap();

        assert_eq!(settings.revision_pager_limit(), 10);
        assert_eq!(settings.general_settings.radio_behavior, RadioBehavior::Linear);
        assert_eq!(
            settings.general_settings.layout_plugins,
            vec![
                PluginSetting::new("unified_fields", true, -3),
                PluginSetting::new("split_fields", false, 0),
            ]
        );
        let text = &settings.field_plugins["text_long"];
        assert_eq!(text.plugin_id, "text_field_diff_builder");
        assert_eq!(text.settings["markdown"], Value::from("filter_xss"));
    }

    #[test]
    fn zero_pager_limit_is_clamped() {
        let settings =
            DiffSettings::from_toml_str("[general_settings]\nrevision_pager_limit = 0\n").unwrap();
        assert_eq!(settings.revision_pager_limit(), 1);
    }

    #[test]
    fn unknown_radio_behavior_is_rejected() {
        let err = DiffSettings::from_toml_str("[general_settings]\nradio_behavior = \"zigzag\"\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }
}
