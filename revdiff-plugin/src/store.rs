//! Access to saved diff configuration.

use crate::error::ConfigError;
use crate::field::{FieldPluginConfig, StoredFieldPlugin};
use crate::settings::{DiffSettings, PluginSetting, RadioBehavior};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::info;

/// Configuration collaborator consumed by the overview and the registry.
pub trait ConfigStore: Send + Sync {
    /// Layout plugin settings in declaration order.
    fn layout_plugin_settings(&self) -> Vec<PluginSetting>;

    fn radio_behavior(&self) -> RadioBehavior;

    fn revision_pager_limit(&self) -> usize;

    fn field_plugin_config(&self, field_type: &str) -> Result<Option<FieldPluginConfig>, ConfigError>;

    /// Persists `config` under its field type, replacing any previous entry.
    fn save_field_plugin_config(&self, config: &FieldPluginConfig) -> Result<(), ConfigError>;
}

/// In-memory store seeded from [`DiffSettings`].
pub struct MemoryConfigStore {
    settings: DiffSettings,
    field_plugins: Mutex<BTreeMap<String, StoredFieldPlugin>>,
}

impl MemoryConfigStore {
    pub fn new(settings: DiffSettings) -> Self {
        let field_plugins = Mutex::new(settings.field_plugins.clone());
        Self {
            settings,
            field_plugins,
        }
    }

    /// Current state, including field plugin changes, for writing back to disk.
    pub fn snapshot(&self) -> Result<DiffSettings, ConfigError> {
        let field_plugins = self.field_plugins.lock().map_err(|_| ConfigError::Lock)?;
        Ok(DiffSettings {
            general_settings: self.settings.general_settings.clone(),
            field_plugins: field_plugins.clone(),
        })
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new(DiffSettings::default())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn layout_plugin_settings(&self) -> Vec<PluginSetting> {
        self.settings.general_settings.layout_plugins.clone()
    }

    fn radio_behavior(&self) -> RadioBehavior {
        self.settings.general_settings.radio_behavior
    }

    fn revision_pager_limit(&self) -> usize {
        self.settings.revision_pager_limit()
    }

    fn field_plugin_config(&self, field_type: &str) -> Result<Option<FieldPluginConfig>, ConfigError> {
        let field_plugins = self.field_plugins.lock().map_err(|_| ConfigError::Lock)?;
        Ok(field_plugins
            .get(field_type)
            .cloned()
            .map(|stored| FieldPluginConfig::from_stored(field_type, stored)))
    }

    fn save_field_plugin_config(&self, config: &FieldPluginConfig) -> Result<(), ConfigError> {
        let mut field_plugins = self.field_plugins.lock().map_err(|_| ConfigError::Lock)?;
        field_plugins.insert(config.field_type.clone(), config.to_stored());
        info!(
            field_type = %config.field_type,
            plugin_id = %config.plugin_id,
            "Saved field plugin configuration"
        );
        Ok(())
    }
}
