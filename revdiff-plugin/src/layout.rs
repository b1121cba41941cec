//! Diff layout strategies.
//!
//! A layout decides how a two-revision comparison is visually organised.
//! Rendering itself happens in the host; the core only needs to know which
//! layouts exist and how they are configured.

use crate::catalog::{PluginCatalog, PluginDefinition};
use crate::strategy::ConfigurablePlugin;

pub trait DiffLayout: ConfigurablePlugin {
    /// Short description shown next to the layout option.
    fn description(&self) -> &'static str;
}

/// Old and new values side by side, one row per field.
pub struct SplitFieldsLayout;

impl ConfigurablePlugin for SplitFieldsLayout {}

impl DiffLayout for SplitFieldsLayout {
    fn description(&self) -> &'static str {
        "Field based layout, displays revision comparison side by side."
    }
}

/// Old and new values interleaved in a single column.
pub struct UnifiedFieldsLayout;

impl ConfigurablePlugin for UnifiedFieldsLayout {}

impl DiffLayout for UnifiedFieldsLayout {
    fn description(&self) -> &'static str {
        "Field based layout, displays revision comparison line by line."
    }
}

/// Rendered entity with changes marked inline.
pub struct VisualInlineLayout;

impl ConfigurablePlugin for VisualInlineLayout {}

impl DiffLayout for VisualInlineLayout {
    fn description(&self) -> &'static str {
        "Visual layout, displays revision comparison using the entity type view mode."
    }
}

fn split_fields() -> Box<dyn DiffLayout> {
    Box::new(SplitFieldsLayout)
}

fn unified_fields() -> Box<dyn DiffLayout> {
    Box::new(UnifiedFieldsLayout)
}

fn visual_inline() -> Box<dyn DiffLayout> {
    Box::new(VisualInlineLayout)
}

impl PluginCatalog<dyn DiffLayout> {
    /// Catalog of the built-in layouts.
    pub fn layouts() -> Self {
        Self::from_definitions(vec![
            PluginDefinition::new("split_fields", "Split fields", split_fields),
            PluginDefinition::new("unified_fields", "Unified fields", unified_fields),
            PluginDefinition::new("visual_inline", "Visual inline", visual_inline),
        ])
    }
}
