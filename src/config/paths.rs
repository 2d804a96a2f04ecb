//! Path management for the back-office client
//!
//! Provides XDG-compliant path resolution for the settings and session files.
//!
//! ## Path Resolution Order
//!
//! 1. `BACKOFFICE_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/backoffice-cli` or `~/.config/backoffice-cli`
//! 3. Windows: `%APPDATA%\backoffice-cli`

use std::path::PathBuf;

use crate::error::BackofficeError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BACKOFFICE_CLI_DATA_DIR";

/// Manages all paths used by the back-office client
#[derive(Debug, Clone)]
pub struct BackofficePaths {
    /// Base directory for all client state
    base_dir: PathBuf,
}

impl BackofficePaths {
    /// Create a new BackofficePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BackofficeError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BackofficePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/backoffice-cli/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the persisted session (token + username)
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BackofficeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackofficeError::Io(format!("Failed to create base directory: {}", e)))
    }
}

/// Resolve the default base directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BackofficeError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BackofficeError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("backoffice-cli"))
}

/// Resolve the default base directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BackofficeError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BackofficeError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("backoffice-cli"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.session_file(), temp_dir.path().join("session.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("backoffice-cli");
        let paths = BackofficePaths::with_base_dir(nested.clone());

        paths.ensure_directories().unwrap();

        assert!(nested.is_dir());
    }
}
