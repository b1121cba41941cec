//! revdiff command-line front end
//!
//! Lists the revisions of an entity from a JSON fixture, validates a pair of
//! picks into a comparison target, and manages per-field diff builder
//! settings stored in the TOML settings file.
//!
//! Usage:
//!   revdiff overview --fixture revisions.json --entity 42
//!   revdiff compare --fixture revisions.json --entity 42 --left 3 --right 7
//!   revdiff field text_long --plugin text_field_diff_builder --set markdown=filter_xss

use anyhow::{Context, Result, anyhow, bail};
use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use revdiff_overview::{
    AllowAll, EntityContext, OverviewPage, OverviewRow, RevisionFixture, RevisionOverview,
};
use revdiff_plugin::{
    ConfigStore, DiffLayout, DiffSettings, FieldDiffBuilder, FieldPluginConfig,
    MemoryConfigStore, PluginCatalog, PluginSettings, resolve_field_builder,
};
use revdiff_types::{EntityId, RevisionId};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "revdiff")]
#[command(about = "Browse revision history and build comparison targets")]
struct Cli {
    /// Path to the diff settings file
    #[arg(short, long, default_value = "revdiff.toml", global = true)]
    settings: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the revision overview of an entity
    Overview {
        #[command(flatten)]
        source: EntitySource,

        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate two picks and print the comparison target
    Compare {
        #[command(flatten)]
        source: EntitySource,

        /// Left pick; defaults to the pre-selected one
        #[arg(long)]
        left: Option<u64>,

        /// Right pick; defaults to the pre-selected one
        #[arg(long)]
        right: Option<u64>,
    },

    /// Show or change the diff builder used for a field type
    Field {
        /// Field type, e.g. text_long
        field_type: String,

        /// Builder to assign; the settings file is updated
        #[arg(long)]
        plugin: Option<String>,

        /// Builder option as key=value (value parsed as JSON when possible)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct EntitySource {
    /// JSON fixture with entities and their revisions
    #[arg(short, long)]
    fixture: PathBuf,

    /// Entity id inside the fixture
    #[arg(short, long)]
    entity: String,

    /// Zero-based overview page
    #[arg(short, long, default_value = "0")]
    page: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Command::Overview { source, json } => {
            let config = MemoryConfigStore::new(DiffSettings::load_from(&cli.settings));
            let page = build_page(&config, &source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page);
            }
        }
        Command::Compare {
            source,
            left,
            right,
        } => {
            let config = MemoryConfigStore::new(DiffSettings::load_from(&cli.settings));
            let page = build_page(&config, &source)?;
            let (default_left, default_right) = page.initial_selection();
            let left = left.map(RevisionId::new).or(default_left);
            let right = right.map(RevisionId::new).or(default_right);
            debug!(?left, ?right, "Submitting comparison");

            match page.submit(left, right) {
                Ok(request) => println!("{}", request.target()),
                Err(e) => bail!("{e}"),
            }
        }
        Command::Field {
            field_type,
            plugin,
            options,
        } => {
            configure_field(&cli.settings, &field_type, plugin.as_deref(), &options)?;
        }
    }

    Ok(())
}

fn build_page(config: &MemoryConfigStore, source: &EntitySource) -> Result<OverviewPage> {
    let contents = fs::read_to_string(&source.fixture)
        .with_context(|| format!("Failed to read fixture {:?}", source.fixture))?;
    let fixture = RevisionFixture::from_json_str(&contents)
        .with_context(|| format!("Failed to parse fixture {:?}", source.fixture))?;

    let entity_id = EntityId::new(source.entity.as_str());
    let entity: &EntityContext = fixture
        .entity(&entity_id)
        .ok_or_else(|| anyhow!("Entity {entity_id} is not in the fixture"))?;
    let store = fixture.to_store()?;
    let layouts = PluginCatalog::<dyn DiffLayout>::layouts();

    let overview = RevisionOverview::new(&store, config, &layouts, &AllowAll);
    let page = overview
        .build(entity, source.page)
        .with_context(|| format!("Failed to build overview for {entity_id}"))?;
    Ok(page)
}

fn print_page(page: &OverviewPage) {
    println!("{}", page.title);
    println!();

    for row in &page.rows {
        let radios = if page.comparison_enabled {
            format!("{} {} ", radio(row.is_left_checked()), radio(row.is_right_checked()))
        } else {
            String::new()
        };
        println!(
            "{radios}#{:<6} {}  {:<16} {}",
            row.revision_id,
            format_date(row.created_at),
            row.author,
            row_status(row)
        );
        if let Some(description) = &row.description {
            println!("{:width$}{description}", "", width = radios.len() + 8);
        }
    }

    println!();
    if page.layout_options.is_empty() {
        println!("Layouts: none enabled");
    } else {
        let labels: Vec<&str> = page.layout_options.iter().map(|(_, label)| label.as_str()).collect();
        println!("Layouts: {}", labels.join(", "));
    }
    println!(
        "Page {} ({} listed, {} shown, {} per page, {} selection)",
        page.page + 1,
        page.listed_revisions,
        page.rows.len(),
        page.pager_limit,
        page.radio_behavior.as_str()
    );
}

fn radio(checked: bool) -> &'static str {
    if checked { "(x)" } else { "( )" }
}

fn row_status(row: &OverviewRow) -> String {
    match row.status_label() {
        Some(label) => label.to_string(),
        None => row
            .operations
            .iter()
            .map(|op| op.title.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

fn format_date(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn configure_field(
    settings_path: &Path,
    field_type: &str,
    plugin: Option<&str>,
    options: &[String],
) -> Result<()> {
    let catalog = PluginCatalog::<dyn FieldDiffBuilder>::field_builders();

    let config = match plugin {
        Some(plugin_id) => {
            // Written back below, so a file that does not parse must not be
            // replaced by defaults.
            let settings = DiffSettings::load_strict(settings_path)
                .with_context(|| format!("Failed to load settings {:?}", settings_path))?;
            let config = MemoryConfigStore::new(settings);

            let builder = catalog.instantiate(plugin_id)?;
            let submitted = parse_options(options)?;
            let field_config = FieldPluginConfig::from_submission(
                field_type,
                plugin_id,
                builder.as_ref(),
                &submitted,
            )?;
            config.save_field_plugin_config(&field_config)?;
            config
                .snapshot()?
                .save_to(settings_path)
                .with_context(|| format!("Failed to write settings {:?}", settings_path))?;
            info!(field_type, plugin_id, "Updated settings file");
            config
        }
        None if !options.is_empty() => bail!("--set needs --plugin"),
        None => MemoryConfigStore::new(DiffSettings::load_from(settings_path)),
    };

    let stored = config.field_plugin_config(field_type)?;
    let Some((plugin_id, builder)) = resolve_field_builder(&catalog, stored.as_ref(), field_type)
    else {
        bail!("No diff builder applies to field type {field_type}");
    };
    let effective = match &stored {
        Some(stored) if stored.plugin_id == plugin_id => stored.effective_settings(builder.as_ref()),
        _ => builder.default_config(),
    };

    println!("{field_type}: {plugin_id}");
    for (key, value) in &effective {
        println!("  {key} = {value}");
    }
    Ok(())
}

fn parse_options(options: &[String]) -> Result<PluginSettings> {
    let mut settings = PluginSettings::new();
    for option in options {
        let (key, raw) = option
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got {option:?}"))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        settings.insert(key.trim().to_string(), value);
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse_json_or_fall_back_to_string() {
        let options = vec![
            "show_header=false".to_string(),
            "markdown=filter_xss".to_string(),
            "weight=3".to_string(),
        ];
        let settings = parse_options(&options).unwrap();
        assert_eq!(settings["show_header"], Value::Bool(false));
        assert_eq!(settings["markdown"], Value::String("filter_xss".to_string()));
        assert_eq!(settings["weight"], Value::from(3));
    }

    #[test]
    fn option_without_equals_is_rejected() {
        assert!(parse_options(&["markdown".to_string()]).is_err());
    }

    fn write_settings(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revdiff.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    // ── field builder assignment ─────────────────────────────────────

    #[test]
    fn unparsable_settings_are_not_overwritten() {
        let original = r#"
[general_settings]
revision_pager_limit = 10
radio_behavior = "linear"
stray_line_without_value

[field_plugins.string]
type = "core_field_diff_builder"
"#;
        let (_dir, path) = write_settings(original);

        let result = configure_field(&path, "text_long", Some("text_field_diff_builder"), &[]);

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn assigning_a_builder_keeps_other_settings() {
        let (_dir, path) = write_settings(
            r#"
[general_settings]
revision_pager_limit = 10
radio_behavior = "linear"

[[general_settings.layout_plugins]]
id = "visual_inline"
enabled = true
weight = 0

[field_plugins.string]
type = "core_field_diff_builder"

[field_plugins.string.settings]
markdown = "filter_xss"
"#,
        );

        configure_field(
            &path,
            "text_long",
            Some("text_field_diff_builder"),
            &["compare_format=true".to_string()],
        )
        .unwrap();

        let saved = DiffSettings::load_strict(&path).unwrap();
        assert_eq!(saved.general_settings.revision_pager_limit, 10);
        assert_eq!(saved.general_settings.layout_plugins.len(), 1);
        assert_eq!(saved.field_plugins["string"].settings["markdown"], "filter_xss");
        let text_long = &saved.field_plugins["text_long"];
        assert_eq!(text_long.plugin_id, "text_field_diff_builder");
        assert_eq!(text_long.settings["compare_format"], Value::Bool(true));
    }

    #[test]
    fn missing_settings_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revdiff.toml");

        configure_field(&path, "integer", Some("core_field_diff_builder"), &[]).unwrap();

        let saved = DiffSettings::load_strict(&path).unwrap();
        assert_eq!(saved.field_plugins["integer"].plugin_id, "core_field_diff_builder");
    }

    #[test]
    fn options_without_plugin_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revdiff.toml");

        assert!(configure_field(&path, "text", None, &["markdown=filter_xss".to_string()]).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn dates_render_in_utc() {
        assert_eq!(format_date(0), "1970-01-01 00:00");
        assert_eq!(format_date(1_700_000_000_000), "2023-11-14 22:13");
    }
}
