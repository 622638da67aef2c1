//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. `$PARTNERLINK_API_URL` (API base URL only)
//! 4. CLI flags (applied by the caller via [`Config::with_api_base_url`])
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$PARTNERLINK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/partnerlink/config.toml`
//! 3. `<partnerlink home>/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use partnerlink::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! let config = result.config;
//!
//! println!("API: {}", config.api_base_url());
//! println!("Refresh timeout: {:?}", config.refresh_timeout());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, SecretsConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::paths::PartnerlinkPaths;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PARTNERLINK_CONFIG";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "PARTNERLINK_API_URL";

/// Backend used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str =
    "https://algebraestudentepartneriapi20250329050348.azurewebsites.net/api";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning, if any.
    pub path: Option<PathBuf>,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file
    pub global: GlobalConfig,
    /// Environment or CLI override for the API base URL
    api_url_override: Option<String>,
    /// Path to the config file (if loaded)
    global_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or a
    /// value fails validation. A missing file is not an error.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), PartnerlinkPaths::discover())
    }

    /// Load configuration with an explicit environment lookup and home.
    pub fn load_with<F>(
        env: F,
        paths: Option<PartnerlinkPaths>,
    ) -> Result<ConfigLoadResult, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.is_empty());
        let mut warnings = Vec::new();

        let mut candidates = Vec::new();
        if let Some(path) = env(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        if let Some(xdg) = env("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg).join("partnerlink/config.toml"));
        }
        if let Some(ref paths) = paths {
            candidates.push(paths.config_path());
        }

        let (global, global_path) = match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => (Self::read_global_config(&path)?, Some(path)),
            None => (GlobalConfig::default(), None),
        };
        global.validate()?;

        let api_url_override = env(API_URL_ENV);
        if let Some(ref url) = api_url_override {
            schema::validate_base_url(url)?;
        }

        let config = Config {
            global,
            api_url_override,
            global_path,
        };

        if config.api_base_url().starts_with("http://") && !is_loopback(config.api_base_url()) {
            warnings.push(ConfigWarning {
                message: "api_base_url uses plain HTTP; bearer tokens will be sent unencrypted"
                    .to_string(),
                path: config.global_path.clone(),
            });
        }

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Read and parse a config file.
    pub fn read_global_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for the config file.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        PartnerlinkPaths::discover()
            .map(|p| p.config_path())
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Write global config atomically to the canonical location.
    pub fn write_global(config: &GlobalConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path()?;
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Writes a temp file in the same
    /// directory, syncs it, then renames over the target.
    pub fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Override the API base URL (CLI `--api-url`).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        schema::validate_base_url(&url)?;
        self.api_url_override = Some(url);
        Ok(self)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// API base URL without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .or(self.global.api_base_url.as_deref())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    /// Refresh timeout. Defaults to 30 seconds.
    pub fn refresh_timeout(&self) -> Duration {
        self.global
            .refresh_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(crate::auth::DEFAULT_REFRESH_TIMEOUT)
    }

    /// Per-request timeout. Defaults to 30 seconds.
    pub fn request_timeout(&self) -> Duration {
        self.global
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(crate::api::DEFAULT_REQUEST_TIMEOUT)
    }

    /// User-Agent header.
    pub fn user_agent(&self) -> &str {
        self.global
            .user_agent
            .as_deref()
            .unwrap_or(crate::api::DEFAULT_USER_AGENT)
    }

    /// Secrets provider. Defaults to "file".
    pub fn secrets_provider(&self) -> &str {
        self.global
            .secrets
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or(crate::secrets::DEFAULT_PROVIDER)
    }

    /// Get the path to the loaded config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}
