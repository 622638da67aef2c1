//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the API base must be an absolute
//! http(s) URL, timeouts must be positive and bounded, and the secrets
//! provider must be one the crate knows.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Largest accepted timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// api_base_url = "https://backend.example/api"
/// refresh_timeout_secs = 30
/// request_timeout_secs = 30
/// user_agent = "partnerlink"
///
/// [secrets]
/// provider = "file"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Backend API base URL
    pub api_base_url: Option<String>,

    /// Upper bound on one refresh call
    pub refresh_timeout_secs: Option<u64>,

    /// Upper bound on any single HTTP request
    pub request_timeout_secs: Option<u64>,

    /// User-Agent header override
    pub user_agent: Option<String>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_base_url {
            validate_base_url(url)?;
        }

        for (name, value) in [
            ("refresh_timeout_secs", self.refresh_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if let Some(secs) = value {
                if secs == 0 || secs > MAX_TIMEOUT_SECS {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} must be between 1 and {}, got {}",
                        name, MAX_TIMEOUT_SECS, secs
                    )));
                }
            }
        }

        if let Some(agent) = &self.user_agent {
            if agent.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "user_agent cannot be empty".to_string(),
                ));
            }
        }

        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }

        Ok(())
    }
}

/// Check that a base URL is absolute http(s).
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidValue(format!("invalid api_base_url '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "api_base_url must use http or https, got '{}'",
            other
        ))),
    }
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use ("file" or "keychain")
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Validate the secrets configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = crate::secrets::VALID_PROVIDERS;
        if let Some(provider) = &self.provider {
            if !valid.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    valid.join(", ")
                )));
            }
        }
        Ok(())
    }
}
