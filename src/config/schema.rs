/// Configuration schema and defaults.
///
/// Defines the TOML-serializable structure with sections `[api]`, `[web]`
/// and `[logging]`. Every field has a built-in default; users only set what
/// they want to override.
use serde::{Deserialize, Serialize};

/// Backend the bundled development server listens on.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:8740";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level aieo configuration.
///
/// Maps to `~/.aieo/config.toml` and `.aieo.toml`. All sections and fields
/// are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AieoConfig {
    pub api: ApiConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `aieo web`.
    pub addr: String,
    /// Open the system browser when the server starts.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Record every API call to `~/.aieo/request-log.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AieoConfig {
    /// Annotated default config written by `aieo config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# aieo configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (AIEO_*)
#   2. Project config (.aieo.toml in current directory)
#   3. User global config (~/.aieo/config.toml)
#   4. Built-in defaults
#
# The API key is not stored here; use `aieo key set <KEY>` or AIEO_API_KEY.

[api]
base_url = "{DEFAULT_BASE_URL}"

[web]
addr = "{DEFAULT_WEB_ADDR}"
open_browser = true

[logging]
enabled = true                # Request log at ~/.aieo/request-log.jsonl
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: AieoConfig = toml::from_str(&AieoConfig::default_toml()).unwrap();
        assert_eq!(config, AieoConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: AieoConfig = toml::from_str("[web]\nopen_browser = false\n").unwrap();
        assert!(!config.web.open_browser);
        assert_eq!(config.web.addr, DEFAULT_WEB_ADDR);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.logging.enabled);
    }
}
