//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:18081".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Polling behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval() -> u64 {
    5000 // 5 seconds
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Where the session (token + username) is kept
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: String,
}

fn default_session_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("roomchat").join("session.toml").to_string_lossy().to_string())
        .unwrap_or_else(|| "./roomchat_session.toml".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

/// Terminal front end
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_viewport_lines")]
    pub viewport_lines: usize,
}

fn default_viewport_lines() -> usize {
    20
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            viewport_lines: default_viewport_lines(),
        }
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
    "warn".to_string()
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

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
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
            dirs::config_dir().map(|p| p.join("roomchat").join("config.toml")),
            Some(PathBuf::from("./roomchat.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ROOMCHAT_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("ROOMCHAT_REQUEST_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        if let Ok(interval) = std::env::var("ROOMCHAT_POLL_INTERVAL_MS") {
            if let Ok(i) = interval.parse() {
                self.sync.poll_interval_ms = i;
            }
        }

        if let Ok(path) = std::env::var("ROOMCHAT_SESSION_PATH") {
            self.session.path = path;
        }

        if let Ok(level) = std::env::var("ROOMCHAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ROOMCHAT_LOG_FORMAT") {
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
    r#"# Roomchat Configuration
#
# Environment variables override these settings:
# - ROOMCHAT_API_URL
# - ROOMCHAT_REQUEST_TIMEOUT_SECS
# - ROOMCHAT_POLL_INTERVAL_MS
# - ROOMCHAT_SESSION_PATH
# - ROOMCHAT_LOG_LEVEL
# - ROOMCHAT_LOG_FORMAT

[api]
# Chat backend base URL
base_url = "http://localhost:18081"

# Request timeout in seconds
request_timeout_secs = 30

[sync]
# How often rooms and messages are re-fetched (ms)
poll_interval_ms = 5000

[session]
# File holding the token and username of the logged-in user
# path = "~/.local/share/roomchat/session.toml"

[ui]
# Message lines visible in chat mode
viewport_lines = 20

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
