//! User settings for the back-office client
//!
//! Manages the backend location, request timeout, listing page size and the
//! default log level.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::BackofficePaths;
use crate::error::BackofficeError;

/// Environment variable that overrides the configured API URL
pub const API_URL_ENV: &str = "BACKOFFICE_API_URL";

/// Names accepted by `Settings::set`
pub const SETTING_KEYS: [&str; 4] = ["api_url", "request_timeout_secs", "page_size", "log_level"];

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

// Mirrors the backend's largest audit page
const MAX_PAGE_SIZE: u32 = 1000;

/// User settings for the back-office client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the back-office REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Default number of audit entries fetched by `audit list`
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Log filter used when neither RUST_LOG nor -v is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BackofficePaths) -> Result<Self, BackofficeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackofficeError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackofficeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackofficePaths) -> Result<(), BackofficeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackofficeError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BackofficeError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Update one setting by name, validating the new value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), BackofficeError> {
        let value = value.trim();
        match key {
            "api_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(BackofficeError::Validation(format!(
                        "API URL must start with http:// or https://, got '{}'",
                        value
                    )));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => {
                        return Err(BackofficeError::Validation(format!(
                            "Timeout must be a positive number of seconds, got '{}'",
                            value
                        )))
                    }
                };
            }
            "page_size" => {
                self.page_size = match value.parse::<u32>() {
                    Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
                    _ => {
                        return Err(BackofficeError::Validation(format!(
                            "Page size must be between 1 and {}, got '{}'",
                            MAX_PAGE_SIZE, value
                        )))
                    }
                };
            }
            "log_level" => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(BackofficeError::Validation(format!(
                        "Log level must be one of {}, got '{}'",
                        LOG_LEVELS.join(", "),
                        value
                    )));
                }
                self.log_level = level;
            }
            other => {
                return Err(BackofficeError::Config(format!(
                    "Unknown setting '{}'. Valid settings: {}",
                    other,
                    SETTING_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Resolve the API URL: explicit override, then environment, then file
    pub fn effective_api_url(&self, cli_override: Option<&str>) -> String {
        let env_url = std::env::var(API_URL_ENV).ok();
        resolve_api_url(cli_override, env_url.as_deref(), &self.api_url)
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn resolve_api_url(cli: Option<&str>, env: Option<&str>, configured: &str) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(configured)
        .trim_end_matches('/')
        .to_string()
}
