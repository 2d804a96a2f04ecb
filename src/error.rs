//! Custom error types for the back-office client
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for back-office client operations
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The backend rejected the credentials or the token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No session is stored or the stored one is no longer valid
    #[error("Not logged in. Run 'backoffice login <username>' first.")]
    NotAuthenticated,

    /// Non-success response from the backend
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Transport-level failures (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Session/settings file errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl BackofficeError {
    /// Create a "not found" error for audit log entries
    pub fn audit_log_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Audit log entry",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the backend refused our credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BackofficeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<ureq::Error> for BackofficeError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<csv::Error> for BackofficeError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<serde_yaml::Error> for BackofficeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for back-office client operations
pub type BackofficeResult<T> = Result<T, BackofficeError>;
