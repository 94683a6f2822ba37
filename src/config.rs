//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dataset::{DataSource, LoadOptions};

/// Location of the published CDI extract
pub const DEFAULT_SOURCE_URL: &str =
    "https://github.com/rmejia41/open_datasets/raw/main/chronicdiseases_ind.csv";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// URL or file path of the CDI CSV
    #[serde(default = "default_source_url")]
    pub url: String,

    #[serde(default = "default_source_timeout")]
    pub request_timeout_secs: u64,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_source_timeout() -> u64 {
    120
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            request_timeout_secs: default_source_timeout(),
        }
    }
}

impl SourceConfig {
    /// Parsed data source
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.url)
    }

    /// Loader options derived from this config
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether structured JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("cdi-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/cdi-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source overrides
        if let Some(url) = lookup("CDI_SOURCE_URL") {
            self.source.url = url;
        }
        if let Some(timeout) = lookup("CDI_SOURCE_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.source.request_timeout_secs = timeout;
        }

        // API overrides
        if let Some(host) = lookup("CDI_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("CDI_API_PORT").and_then(|s| s.parse().ok()) {
            self.api.port = port;
        }

        // Logging overrides
        if let Some(level) = lookup("CDI_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CDI_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# CDI Dashboard Configuration
#
# Environment variables override these settings:
# - CDI_SOURCE_URL
# - CDI_SOURCE_TIMEOUT_SECS
# - CDI_API_HOST
# - CDI_API_PORT
# - CDI_LOG_LEVEL
# - CDI_LOG_FORMAT

[source]
# URL or local path of the Chronic Disease Indicators CSV
url = "{}"

# Download timeout in seconds
request_timeout_secs = 120

[api]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8050

# Allowed CORS origins (empty allows any origin)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        DEFAULT_SOURCE_URL
    )
}
