//! TOML-based dashboard configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and falls back to [`DashboardConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Evaluation endpoint location.
    #[serde(default)]
    pub server: ServerConfig,
    /// Terminal UI behavior.
    #[serde(default)]
    pub ui: UiConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Evaluation endpoint location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Scheme, host and port, e.g. `http://127.0.0.1:5001`.
    pub base_url: String,
    /// Path of the evaluation endpoint.
    pub endpoint: String,
    /// Request timeout in seconds (must be > 0).
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001".to_string(),
            endpoint: "/api/evaluate".to_string(),
            // A full evaluation episode runs server-side before responding.
            timeout_secs: 120,
        }
    }
}

impl ServerConfig {
    /// Full endpoint URL.
    pub fn evaluate_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint)
    }
}

/// Terminal UI behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Event-loop poll interval in milliseconds.
    pub tick_ms: u64,
    /// Trigger one evaluation at start-up.
    pub auto_run: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            auto_run: true,
        }
    }
}

/// Log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file. Required for logging while the terminal UI is active.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"server.base_url"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DashboardConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.server;
        if !(s.base_url.starts_with("http://") || s.base_url.starts_with("https://")) {
            errors.push(ConfigError {
                field: "server.base_url".into(),
                message: format!("must start with http:// or https://, got \"{}\"", s.base_url),
            });
        }
        if !s.endpoint.starts_with('/') {
            errors.push(ConfigError {
                field: "server.endpoint".into(),
                message: "must start with \"/\"".into(),
            });
        }
        if s.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "server.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        if !(10..=5000).contains(&self.ui.tick_ms) {
            errors.push(ConfigError {
                field: "ui.tick_ms".into(),
                message: "must be in [10, 5000]".into(),
            });
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            });
        }

        errors
    }
}
