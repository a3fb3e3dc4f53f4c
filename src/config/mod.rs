/// Configuration system for aieo.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::AieoConfig::default()`]
/// 2. **User global config**: `~/.aieo/config.toml`
/// 3. **Project local config**: `.aieo.toml` in the current working directory
/// 4. **Environment variables**: `AIEO_*` overrides (highest precedence)
///
/// File layers are deep-merged key by key, so a project file that only sets
/// `[web] addr` keeps the global file's `[api] base_url`.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::AieoConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration from the standard locations and
/// the process environment.
pub fn load() -> AieoConfig {
    let paths: Vec<PathBuf> = [global_config_path(), project_config_path()]
        .into_iter()
        .flatten()
        .collect();
    load_from(&paths, |key| std::env::var(key).ok())
}

/// Load from explicit file layers (lowest precedence first) and an
/// environment lookup.
pub fn load_from<F>(paths: &[PathBuf], env: F) -> AieoConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut merged = toml::Value::Table(toml::map::Map::new());
    for path in paths {
        if let Some(layer) = load_toml_layer(path) {
            merge_values(&mut merged, layer);
        }
    }

    let mut config: AieoConfig = merged.try_into().unwrap_or_default();
    apply_env_overrides(&mut config, env);
    config
}

/// Read one TOML layer.
///
/// Returns `None` if the file doesn't exist or doesn't describe a valid
/// config. Malformed files are ignored rather than failing every command.
fn load_toml_layer(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    value.clone().try_into::<AieoConfig>().ok()?;
    Some(value)
}

/// Recursively merge `overlay` into `base`; overlay wins on leaf conflicts.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// The per-user state directory, `~/.aieo`.
pub fn aieo_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aieo"))
}

/// Path to the user global config: `~/.aieo/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    aieo_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.aieo.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".aieo.toml"))
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
/// - `AIEO_API_URL`: backend base URL
/// - `AIEO_WEB_ADDR`: listen address for `aieo web`
/// - `AIEO_OPEN_BROWSER`: open the browser on `aieo web` (`1`/`true`/`yes`/`on`)
/// - `AIEO_LOG_REQUESTS`: request log enabled
fn apply_env_overrides<F>(config: &mut AieoConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = env("AIEO_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = env("AIEO_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = env("AIEO_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }
    if let Some(val) = env("AIEO_LOG_REQUESTS") {
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

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.aieo/config.toml`.
///
/// Returns an error if the file already exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, AieoConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key (dotted, e.g. `api.base_url`) in the global
/// config file, creating it from defaults when absent.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&AieoConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    root.clone()
        .try_into::<AieoConfig>()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The existing value's type decides how `raw_value` is parsed; unknown
/// sections are rejected.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        _ => toml::Value::String(raw_value.to_string()),
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
