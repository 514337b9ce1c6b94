/// Configuration schema and defaults for the sheweldo client.
///
/// Defines the TOML-serializable configuration structure with sections
/// `[api]`, `[forms]`, `[charts]`, and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level client configuration.
///
/// Maps directly to `~/.sheweldo/config.toml` and `.sheweldo.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheweldoConfig {
    pub api: ApiConfig,
    pub forms: FormsConfig,
    pub charts: ChartsConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Which set of backend routes to talk to.
///
/// Two deployments of the backend exist with different submit paths and
/// redirect targets. See [`crate::api::Endpoints`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointVariant {
    /// `/api/company/submit`, `/api/employee/submit`.
    #[default]
    Primary,
    /// `/api/companies/add`, `/api/salaries/submit`.
    Legacy,
}

impl std::fmt::Display for EndpointVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Route set: `primary` or `legacy`.
    pub variant: EndpointVariant,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            variant: EndpointVariant::default(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [forms]
// ---------------------------------------------------------------------------

/// Form submission timing and follow-up behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// How long a status message stays visible (milliseconds).
    pub message_hide_ms: u64,
    /// Delay before opening the salary form after a company submission.
    pub company_redirect_delay_ms: u64,
    /// Delay before moving to the graph page after a salary submission.
    pub salary_redirect_delay_ms: u64,
    /// Open follow-up pages in the system browser.
    pub open_browser: bool,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            message_hide_ms: 5000,
            company_redirect_delay_ms: 1000,
            salary_redirect_delay_ms: 500,
            open_browser: false,
        }
    }
}

// ---------------------------------------------------------------------------
// [charts]
// ---------------------------------------------------------------------------

/// Chart colors and terminal layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Color of the highlighted bucket and the well-compensated slice.
    pub highlight_color: String,
    /// Color of every other bucket and the poorly-compensated slice.
    pub base_color: String,
    /// Width of the longest bar in terminal cells.
    pub bar_width: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            highlight_color: "#7b63b8".to_string(),
            base_color: "#4b4b4b".to_string(),
            bar_width: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether client events are appended to the event log.
    pub enabled: bool,
    /// Path to the event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.sheweldo/events.jsonl".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Resolve the configured path, expanding a leading `~`.
    pub fn resolved_path(&self) -> Option<std::path::PathBuf> {
        if let Some(rest) = self.path.strip_prefix("~/") {
            dirs::home_dir().map(|home| home.join(rest))
        } else if self.path.is_empty() {
            None
        } else {
            Some(std::path::PathBuf::from(&self.path))
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl SheweldoConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `sheweldo config init`.
    pub fn default_toml() -> String {
        r##"# sheweldo client configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SHEWELDO_*)
#   2. Project config (.sheweldo.toml in current directory)
#   3. User global config (~/.sheweldo/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://127.0.0.1:5000"
variant = "primary"          # primary | legacy
timeout_ms = 30000

[forms]
message_hide_ms = 5000
company_redirect_delay_ms = 1000
salary_redirect_delay_ms = 500
open_browser = false         # Open follow-up pages in the system browser

[charts]
highlight_color = "#7b63b8"
base_color = "#4b4b4b"
bar_width = 40

[logging]
enabled = true
path = "~/.sheweldo/events.jsonl"
"##
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let config: SheweldoConfig = toml::from_str(&SheweldoConfig::default_toml()).unwrap();
        assert_eq!(config.api.variant, EndpointVariant::Primary);
        assert_eq!(config.forms.message_hide_ms, 5000);
        assert_eq!(config.charts.highlight_color, "#7b63b8");
        assert!(config.logging.enabled);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: SheweldoConfig = toml::from_str(
            r#"
[api]
variant = "legacy"
"#,
        )
        .unwrap();
        assert_eq!(config.api.variant, EndpointVariant::Legacy);
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.forms.salary_redirect_delay_ms, 500);
    }

    #[test]
    fn variant_display() {
        assert_eq!(EndpointVariant::Primary.to_string(), "primary");
        assert_eq!(EndpointVariant::Legacy.to_string(), "legacy");
    }

    #[test]
    fn logging_path_without_tilde_is_literal() {
        let cfg = LoggingConfig {
            enabled: true,
            path: "/tmp/events.jsonl".to_string(),
        };
        assert_eq!(
            cfg.resolved_path(),
            Some(std::path::PathBuf::from("/tmp/events.jsonl"))
        );
    }
}
