//! Capabilities shared by every configurable strategy.
//!
//! Layouts and field diff builders do not inherit from a base type; each
//! implements [`ConfigurablePlugin`] and is picked through the registry.

use crate::error::PluginError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Option name → value. Ordered so persisted output is stable.
pub type PluginSettings = BTreeMap<String, Value>;

/// Settings keys starting with `#` are form markers (e.g. `#field_type`)
/// and must never be persisted.
pub fn is_internal_key(key: &str) -> bool {
    key.starts_with('#')
}

/// Returns a copy of `settings` without internal keys.
pub fn strip_internal_keys(settings: &PluginSettings) -> PluginSettings {
    settings
        .iter()
        .filter(|(key, _)| !is_internal_key(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Configuration form description handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigForm {
    pub elements: Vec<FormElement>,
}

impl ConfigForm {
    pub fn push(&mut self, element: FormElement) {
        self.elements.push(element);
    }

    pub fn get(&self, name: &str) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements ordered by weight, declaration order on ties.
    pub fn sorted(&self) -> Vec<&FormElement> {
        let mut elements: Vec<&FormElement> = self.elements.iter().collect();
        elements.sort_by_key(|e| e.weight);
        elements
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    pub name: String,
    pub title: String,
    pub kind: FormElementKind,
    pub default_value: Value,
    #[serde(default)]
    pub weight: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FormElementKind {
    Checkbox,
    /// `(value, label)` pairs in display order.
    Select { options: Vec<(String, String)> },
}

/// `{default_config, build_config_form, validate, submit}` capability set.
pub trait ConfigurablePlugin: Send + Sync {
    /// Settings used when nothing has been saved yet.
    fn default_config(&self) -> PluginSettings {
        PluginSettings::new()
    }

    /// Describes the form used to edit `current`.
    fn build_config_form(&self, current: &PluginSettings) -> ConfigForm {
        let _ = current;
        ConfigForm::default()
    }

    /// Validate submitted values. Return `Err` to reject the submission.
    fn validate(&self, values: &PluginSettings) -> Result<(), PluginError> {
        let _ = values;
        Ok(())
    }

    /// Turns submitted values into settings. Defaults are merged underneath
    /// so options missing from the submission keep their default.
    fn submit(&self, values: &PluginSettings) -> PluginSettings {
        let mut settings = self.default_config();
        settings.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        settings
    }
}
