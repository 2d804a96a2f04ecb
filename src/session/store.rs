//! Persisted session file
//!
//! Holds the bearer token and username between invocations. Writes are
//! atomic (temp file then rename) and the file is private to the current
//! user on Unix.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{BackofficeError, BackofficeResult};

/// Token and username as written to `session.json`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct StoredSession {
    pub token: String,
    pub username: String,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session
    ///
    /// A missing file is no session. An unreadable or corrupt file is also
    /// treated as no session so the user can simply log in again.
    pub fn load(&self) -> Option<StoredSession> {
        if !self.path.exists() {
            return None;
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot open session file");
                return None;
            }
        };

        match serde_json::from_reader::<_, StoredSession>(BufReader::new(file)) {
            Ok(session) if !session.token.is_empty() => Some(session),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                None
            }
        }
    }

    /// Persist the session atomically
    pub fn save(&self, session: &StoredSession) -> BackofficeResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BackofficeError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Create temp file in same directory (important for atomic rename)
        let temp_path = self.path.with_extension("json.tmp");

        let file = File::create(&temp_path)
            .map_err(|e| BackofficeError::Storage(format!("Failed to create temp file: {}", e)))?;
        restrict_permissions(&temp_path)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, session)
            .map_err(|e| BackofficeError::Storage(format!("Failed to serialize session: {}", e)))?;
        writer
            .flush()
            .map_err(|e| BackofficeError::Storage(format!("Failed to flush session: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| BackofficeError::Storage(format!("Failed to sync session: {}", e)))?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            BackofficeError::Storage(format!("Failed to rename temp file: {}", e))
        })?;

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the session file if present
    pub fn clear(&self) -> BackofficeResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackofficeError::Storage(format!(
                "Failed to remove session file: {}",
                e
            ))),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> BackofficeResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| BackofficeError::Storage(format!("Failed to restrict session file: {}", e)))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> BackofficeResult<()> {
    Ok(())
}
