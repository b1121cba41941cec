//! Weighted view of a catalog under saved configuration.
//!
//! Pure: the registry takes a snapshot of the settings at construction and
//! never writes anything back. Build a new registry to observe changes.

use crate::catalog::PluginCatalog;
use crate::error::PluginError;
use crate::settings::PluginSetting;
use serde::{Deserialize, Serialize};

/// A catalog definition overlaid with its saved setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub id: String,
    pub label: String,
    pub weight: i32,
    pub enabled: bool,
}

pub struct PluginRegistry<'a, T: ?Sized> {
    catalog: &'a PluginCatalog<T>,
    settings: Vec<PluginSetting>,
}

impl<'a, T: ?Sized> PluginRegistry<'a, T> {
    /// Overlays `settings` onto `catalog`.
    ///
    /// Settings behave like a map keyed by plugin id: a repeated id replaces
    /// the earlier value but keeps the earlier declaration position.
    pub fn new(
        catalog: &'a PluginCatalog<T>,
        settings: impl IntoIterator<Item = PluginSetting>,
    ) -> Self {
        let mut merged: Vec<PluginSetting> = Vec::new();
        for setting in settings {
            match merged.iter_mut().find(|s| s.id == setting.id) {
                Some(existing) => *existing = setting,
                None => merged.push(setting),
            }
        }
        Self {
            catalog,
            settings: merged,
        }
    }

    /// Enabled plugins sorted by ascending weight (stable on ties).
    ///
    /// Catalog plugins without a setting are not listed, and settings naming
    /// a plugin the catalog does not know are skipped (see [`unknown_ids`]).
    ///
    /// [`unknown_ids`]: Self::unknown_ids
    pub fn list_enabled(&self) -> Vec<PluginDescriptor> {
        let mut enabled: Vec<PluginDescriptor> = self
            .settings
            .iter()
            .filter(|setting| setting.enabled)
            .filter_map(|setting| {
                self.catalog.get(&setting.id).map(|definition| PluginDescriptor {
                    id: setting.id.clone(),
                    label: definition.label.clone(),
                    weight: setting.weight,
                    enabled: true,
                })
            })
            .collect();
        enabled.sort_by_key(|descriptor| descriptor.weight);
        enabled
    }

    /// `(id, label)` pairs in [`list_enabled`](Self::list_enabled) order.
    pub fn options(&self) -> Vec<(String, String)> {
        self.list_enabled()
            .into_iter()
            .map(|descriptor| (descriptor.id, descriptor.label))
            .collect()
    }

    /// Id of the first enabled plugin, or `None` when nothing is enabled.
    pub fn default_id(&self) -> Option<String> {
        self.list_enabled().into_iter().next().map(|d| d.id)
    }

    /// Setting ids that no registered plugin answers to. Listing skips them;
    /// callers decide whether to log.
    pub fn unknown_ids(&self) -> Vec<&str> {
        self.settings
            .iter()
            .map(|setting| setting.id.as_str())
            .filter(|id| !self.catalog.contains(id))
            .collect()
    }

    /// Saved setting for `id`, if any.
    pub fn setting(&self, id: &str) -> Option<&PluginSetting> {
        self.settings.iter().find(|s| s.id == id)
    }

    /// Instantiates an enabled plugin.
    pub fn instantiate(&self, id: &str) -> Result<Box<T>, PluginError> {
        match self.setting(id) {
            Some(setting) if setting.enabled => self.catalog.instantiate(id),
            _ => Err(PluginError::UnknownPlugin(id.to_string())),
        }
    }

    /// Instantiates the default plugin, if any is enabled.
    pub fn instantiate_default(&self) -> Option<Box<T>> {
        self.default_id()
            .and_then(|id| self.catalog.instantiate(&id).ok())
    }

    pub fn catalog(&self) -> &'a PluginCatalog<T> {
        self.catalog
    }
}
