//! Field diff builders and their per-field-type configuration.
//!
//! Each field type is compared by one builder. The choice and its settings
//! are saved as a [`FieldPluginConfig`], keyed by field type.

use crate::catalog::{PluginCatalog, PluginDefinition};
use crate::error::PluginError;
use crate::strategy::{
    ConfigForm, ConfigurablePlugin, FormElement, FormElementKind, PluginSettings,
    strip_internal_keys,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// How markup is cleaned before values are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkdownCallback {
    #[default]
    HtmlToText,
    FilterXss,
    FilterXssAll,
}

impl MarkdownCallback {
    pub const ALL: [MarkdownCallback; 3] = [Self::HtmlToText, Self::FilterXss, Self::FilterXssAll];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HtmlToText => "html_to_text",
            Self::FilterXss => "filter_xss",
            Self::FilterXssAll => "filter_xss_all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HtmlToText => "HTML to text",
            Self::FilterXss => "Filter XSS (some tags)",
            Self::FilterXssAll => "Filter XSS (all tags)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A strategy computing the difference for one or more field types.
pub trait FieldDiffBuilder: ConfigurablePlugin {
    /// Field types this builder can compare.
    fn field_types(&self) -> &'static [&'static str];

    fn applies_to(&self, field_type: &str) -> bool {
        self.field_types().iter().any(|t| *t == field_type)
    }
}

fn base_default_config() -> PluginSettings {
    PluginSettings::from([
        ("show_header".to_string(), Value::Bool(true)),
        (
            "markdown".to_string(),
            Value::String(MarkdownCallback::default().as_str().to_string()),
        ),
    ])
}

fn base_config_form(current: &PluginSettings, defaults: &PluginSettings) -> ConfigForm {
    let value_of = |key: &str| {
        current
            .get(key)
            .or_else(|| defaults.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let mut form = ConfigForm::default();
    form.push(FormElement {
        name: "show_header".into(),
        title: "Show field title".into(),
        kind: FormElementKind::Checkbox,
        default_value: value_of("show_header"),
        weight: -5,
        description: None,
    });
    form.push(FormElement {
        name: "markdown".into(),
        title: "Markdown callback".into(),
        kind: FormElementKind::Select {
            options: MarkdownCallback::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), c.label().to_string()))
                .collect(),
        },
        default_value: value_of("markdown"),
        weight: 0,
        description: Some(
            "These provide ways to clean markup tags to make comparisons easier to read.".into(),
        ),
    });
    form
}

fn validate_bool(values: &PluginSettings, key: &str) -> Result<(), PluginError> {
    match values.get(key) {
        None | Some(Value::Bool(_)) => Ok(()),
        // Checkbox submissions may arrive as 0/1.
        Some(Value::Number(n)) if n.as_u64().is_some_and(|n| n <= 1) => Ok(()),
        Some(other) => Err(PluginError::InvalidSetting {
            key: key.to_string(),
            message: format!("expected a boolean, got {other}"),
        }),
    }
}

fn validate_base(values: &PluginSettings) -> Result<(), PluginError> {
    validate_bool(values, "show_header")?;
    match values.get("markdown") {
        None => Ok(()),
        Some(Value::String(s)) if MarkdownCallback::parse(s).is_some() => Ok(()),
        Some(other) => Err(PluginError::InvalidSetting {
            key: "markdown".to_string(),
            message: format!("unknown markdown callback {other}"),
        }),
    }
}

/// Plain scalar fields compared by their string value.
pub struct CoreFieldBuilder;

impl ConfigurablePlugin for CoreFieldBuilder {
    fn default_config(&self) -> PluginSettings {
        base_default_config()
    }

    fn build_config_form(&self, current: &PluginSettings) -> ConfigForm {
        base_config_form(current, &self.default_config())
    }

    fn validate(&self, values: &PluginSettings) -> Result<(), PluginError> {
        validate_base(values)
    }
}

impl FieldDiffBuilder for CoreFieldBuilder {
    fn field_types(&self) -> &'static [&'static str] {
        &[
            "string",
            "string_long",
            "integer",
            "decimal",
            "float",
            "boolean",
            "email",
            "telephone",
            "link",
            "list_string",
            "list_integer",
        ]
    }
}

/// Formatted text fields; can also compare the text format.
pub struct TextFieldBuilder;

impl ConfigurablePlugin for TextFieldBuilder {
    fn default_config(&self) -> PluginSettings {
        let mut settings = base_default_config();
        settings.insert("compare_format".to_string(), Value::Bool(false));
        settings
    }

    fn build_config_form(&self, current: &PluginSettings) -> ConfigForm {
        let defaults = self.default_config();
        let mut form = base_config_form(current, &defaults);
        form.push(FormElement {
            name: "compare_format".into(),
            title: "Compare format".into(),
            kind: FormElementKind::Checkbox,
            default_value: current
                .get("compare_format")
                .or_else(|| defaults.get("compare_format"))
                .cloned()
                .unwrap_or(Value::Bool(false)),
            weight: 5,
            description: Some("This is only used if the \"Text format\" is changed.".into()),
        });
        form
    }

    fn validate(&self, values: &PluginSettings) -> Result<(), PluginError> {
        validate_base(values)?;
        validate_bool(values, "compare_format")
    }
}

impl FieldDiffBuilder for TextFieldBuilder {
    fn field_types(&self) -> &'static [&'static str] {
        &["text", "text_long", "text_with_summary"]
    }
}

fn core_field_diff_builder() -> Box<dyn FieldDiffBuilder> {
    Box::new(CoreFieldBuilder)
}

fn text_field_diff_builder() -> Box<dyn FieldDiffBuilder> {
    Box::new(TextFieldBuilder)
}

impl PluginCatalog<dyn FieldDiffBuilder> {
    /// Catalog of the built-in field diff builders.
    pub fn field_builders() -> Self {
        Self::from_definitions(vec![
            PluginDefinition::new(
                "text_field_diff_builder",
                "Text field diff",
                text_field_diff_builder,
            ),
            PluginDefinition::new(
                "core_field_diff_builder",
                "Core field diff",
                core_field_diff_builder,
            ),
        ])
    }
}

/// Persisted form of a field type's builder choice: `{type, settings}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFieldPlugin {
    #[serde(rename = "type")]
    pub plugin_id: String,
    #[serde(default)]
    pub settings: PluginSettings,
}

/// Builder choice and settings for one field type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPluginConfig {
    pub field_type: String,
    pub plugin_id: String,
    pub settings: PluginSettings,
}

impl FieldPluginConfig {
    /// Shapes a configuration form submission.
    ///
    /// The builder must apply to `field_type`. Submitted values are validated,
    /// merged over the builder's defaults, and stripped of internal keys such
    /// as `#field_type`.
    pub fn from_submission(
        field_type: &str,
        plugin_id: &str,
        builder: &dyn FieldDiffBuilder,
        submitted: &PluginSettings,
    ) -> Result<Self, PluginError> {
        if !builder.applies_to(field_type) {
            return Err(PluginError::NotApplicable {
                plugin_id: plugin_id.to_string(),
                field_type: field_type.to_string(),
            });
        }
        let values = strip_internal_keys(submitted);
        builder.validate(&values)?;
        let settings = strip_internal_keys(&builder.submit(&values));

        debug!(field_type, plugin_id, "Field plugin configuration submitted");
        Ok(Self {
            field_type: field_type.to_string(),
            plugin_id: plugin_id.to_string(),
            settings,
        })
    }

    pub fn from_stored(field_type: impl Into<String>, stored: StoredFieldPlugin) -> Self {
        Self {
            field_type: field_type.into(),
            plugin_id: stored.plugin_id,
            settings: strip_internal_keys(&stored.settings),
        }
    }

    /// The record written to configuration, keyed externally by field type.
    pub fn to_stored(&self) -> StoredFieldPlugin {
        StoredFieldPlugin {
            plugin_id: self.plugin_id.clone(),
            settings: strip_internal_keys(&self.settings),
        }
    }

    /// Saved settings with the builder's defaults filled in underneath.
    pub fn effective_settings(&self, builder: &dyn FieldDiffBuilder) -> PluginSettings {
        let mut settings = builder.default_config();
        settings.extend(strip_internal_keys(&self.settings));
        settings
    }
}

/// Picks the builder for `field_type`.
///
/// The saved choice wins when it names a registered builder that applies to
/// the field type; otherwise the first catalog builder declaring the type is
/// used. Returns the builder id alongside the instance.
pub fn resolve_field_builder(
    catalog: &PluginCatalog<dyn FieldDiffBuilder>,
    stored: Option<&FieldPluginConfig>,
    field_type: &str,
) -> Option<(String, Box<dyn FieldDiffBuilder>)> {
    if let Some(config) = stored {
        match catalog.instantiate(&config.plugin_id) {
            Ok(builder) if builder.applies_to(field_type) => {
                return Some((config.plugin_id.clone(), builder));
            }
            Ok(_) => {
                debug!(field_type, plugin_id = %config.plugin_id, "Saved builder does not apply, falling back");
            }
            Err(_) => {
                debug!(field_type, plugin_id = %config.plugin_id, "Saved builder not registered, falling back");
            }
        }
    }

    catalog.iter().find_map(|definition| {
        let builder = definition.instantiate();
        builder
            .applies_to(field_type)
            .then(|| (definition.id.clone(), builder))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_callback_parse_roundtrip() {
        for callback in MarkdownCallback::ALL {
            assert_eq!(MarkdownCallback::parse(callback.as_str()), Some(callback));
        }
        assert_eq!(MarkdownCallback::parse("drupal_html_to_text"), None);
    }

    #[test]
    fn checkbox_accepts_numeric_flags() {
        let values = PluginSettings::from([("show_header".to_string(), Value::from(1))]);
        assert!(validate_base(&values).is_ok());

        let values = PluginSettings::from([("show_header".to_string(), Value::from(2))]);
        assert!(validate_base(&values).is_err());
    }

    #[test]
    fn text_form_extends_base_form() {
        let form = TextFieldBuilder.build_config_form(&PluginSettings::new());
        let names: Vec<&str> = form.sorted().into_iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["show_header", "markdown", "compare_format"]);
    }
}
