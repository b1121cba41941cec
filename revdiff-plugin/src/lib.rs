//! Plugin catalog and registry for revdiff.
//!
//! Diff layouts and field diff builders are strategies registered explicitly
//! in a [`PluginCatalog`] at start-up. Saved configuration ([`PluginSetting`])
//! decides which of them are enabled and in what order; the
//! [`PluginRegistry`] overlays the two at query time.
//!
//! Configuration lives in [`DiffSettings`] (TOML) and is reached through the
//! [`ConfigStore`] trait so hosts can supply their own persistence.

mod catalog;
mod error;
mod field;
mod layout;
mod registry;
mod settings;
mod store;
mod strategy;

pub use catalog::{PluginCatalog, PluginDefinition, PluginFactory};
pub use error::{ConfigError, PluginError};
pub use field::{
    CoreFieldBuilder, FieldDiffBuilder, FieldPluginConfig, MarkdownCallback, StoredFieldPlugin,
    TextFieldBuilder, resolve_field_builder,
};
pub use layout::{DiffLayout, SplitFieldsLayout, UnifiedFieldsLayout, VisualInlineLayout};
pub use registry::{PluginDescriptor, PluginRegistry};
pub use settings::{DiffSettings, GeneralSettings, PluginSetting, RadioBehavior};
pub use store::{ConfigStore, MemoryConfigStore};
pub use strategy::{
    ConfigForm, ConfigurablePlugin, FormElement, FormElementKind, PluginSettings,
    is_internal_key, strip_internal_keys,
};
