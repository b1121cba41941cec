//! Explicitly registered catalog of strategy implementations.
//!
//! The catalog only knows what exists. Whether a plugin is enabled, and in
//! which order plugins are offered, comes from [`PluginSetting`]s overlaid
//! by the registry.
//!
//! [`PluginSetting`]: crate::PluginSetting

use crate::error::PluginError;
use std::fmt;

/// Constructor for one strategy implementation.
pub type PluginFactory<T> = fn() -> Box<T>;

/// A registered plugin: id, human-readable label and factory.
pub struct PluginDefinition<T: ?Sized> {
    pub id: String,
    pub label: String,
    factory: PluginFactory<T>,
}

impl<T: ?Sized> PluginDefinition<T> {
    pub fn new(id: impl Into<String>, label: impl Into<String>, factory: PluginFactory<T>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            factory,
        }
    }

    /// Builds a fresh instance of the strategy.
    pub fn instantiate(&self) -> Box<T> {
        (self.factory)()
    }
}

impl<T: ?Sized> Clone for PluginDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            factory: self.factory,
        }
    }
}

impl<T: ?Sized> fmt::Debug for PluginDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Declaration-ordered set of plugin definitions, unique by id.
pub struct PluginCatalog<T: ?Sized> {
    definitions: Vec<PluginDefinition<T>>,
}

impl<T: ?Sized> PluginCatalog<T> {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    pub(crate) fn from_definitions(definitions: Vec<PluginDefinition<T>>) -> Self {
        Self { definitions }
    }

    /// Registers a plugin. Ids must be unique within the catalog.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        factory: PluginFactory<T>,
    ) -> Result<(), PluginError> {
        let definition = PluginDefinition::new(id, label, factory);
        if self.contains(&definition.id) {
            return Err(PluginError::DuplicatePlugin(definition.id));
        }
        self.definitions.push(definition);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&PluginDefinition<T>> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn instantiate(&self, id: &str) -> Result<Box<T>, PluginError> {
        self.get(id)
            .map(PluginDefinition::instantiate)
            .ok_or_else(|| PluginError::UnknownPlugin(id.to_string()))
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDefinition<T>> {
        self.definitions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<T: ?Sized> Default for PluginCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for PluginCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.definitions.iter()).finish()
    }
}
