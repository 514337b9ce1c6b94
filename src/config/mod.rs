/// Configuration system for the sheweldo client.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::SheweldoConfig::default()`]
/// 2. **User global config**: `~/.sheweldo/config.toml`
/// 3. **Project local config**: `.sheweldo.toml` in the current working directory
/// 4. **Environment variables**: `SHEWELDO_*` overrides (highest precedence)
///
/// Later layers override individual keys; anything no layer sets keeps its
/// built-in default.
///
/// # Usage
///
/// ```rust,ignore
/// use sheweldo::config;
///
/// let cfg = config::load();
/// let endpoints = sheweldo::api::Endpoints::for_variant(cfg.api.variant);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{EndpointVariant, SheweldoConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> SheweldoConfig {
    let mut config = load_layers(global_config_path(), project_config_path());
    apply_env_overrides(&mut config);
    config
}

/// Merge the file layers only. Exposed for tests and `config show`.
pub fn load_layers(global: Option<PathBuf>, project: Option<PathBuf>) -> SheweldoConfig {
    let mut merged = toml::Table::new();
    for path in [global, project].into_iter().flatten() {
        if let Some(layer) = load_toml_file(&path) {
            merge_tables(&mut merged, layer);
        }
    }

    match toml::Value::Table(merged).try_into() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sheweldo: ignoring invalid config: {e}");
            SheweldoConfig::default()
        }
    }
}

/// Load a TOML config file from the given path (if it exists).
///
/// Malformed files are ignored so a broken config never blocks a submission.
fn load_toml_file(path: &Path) -> Option<toml::Table> {
    let content = fs::read_to_string(path).ok()?;
    match content.parse::<toml::Table>() {
        Ok(table) => Some(table),
        Err(e) => {
            eprintln!("sheweldo: ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

/// Overlay `overlay` onto `base` key by key, recursing into tables.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, incoming);
                } else {
                    base.insert(key, toml::Value::Table(incoming));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Directory holding the global config, cookie jar and event log.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sheweldo"))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".sheweldo.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SHEWELDO_API_URL`: backend base URL
/// - `SHEWELDO_API_VARIANT`: `primary` or `legacy`
/// - `SHEWELDO_TIMEOUT_MS`: request timeout
/// - `SHEWELDO_OPEN_BROWSER`: open follow-up pages (`1`/`true`/`yes`/`on`)
/// - `SHEWELDO_LOGGING`: event log on/off
fn apply_env_overrides(config: &mut SheweldoConfig) {
    if let Ok(val) = std::env::var("SHEWELDO_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val.trim_end_matches('/').to_string();
    }
    if let Ok(val) = std::env::var("SHEWELDO_API_VARIANT")
        && let Some(variant) = parse_variant(&val)
    {
        config.api.variant = variant;
    }
    if let Ok(val) = std::env::var("SHEWELDO_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("SHEWELDO_OPEN_BROWSER") {
        config.forms.open_browser = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("SHEWELDO_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse an endpoint variant string.
fn parse_variant(val: &str) -> Option<EndpointVariant> {
    match val.to_ascii_lowercase().as_str() {
        "primary" => Some(EndpointVariant::Primary),
        "legacy" => Some(EndpointVariant::Legacy),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.sheweldo/config.toml`.
///
/// Returns an error if the file already exists and `force` is false.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, SheweldoConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key (e.g. `api.variant`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SheweldoConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let updated = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<SheweldoConfig>(&updated)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, updated).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section, leaf)) = key.split_once('.') else {
        anyhow::bail!("config key must be dotted, e.g. 'api.base_url'");
    };

    let table = root
        .get_mut(section)
        .and_then(toml::Value::as_table_mut)
        .with_context(|| format!("config key not found: section '{section}' in '{key}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
