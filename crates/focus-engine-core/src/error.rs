//! Core error types for focus-engine-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! errors abort an operation before anything is mutated; remote errors are
//! reported but never roll back local state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focus-engine-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Focus session state errors
    #[error("Session error: {0}")]
    Timer(#[from] TimerError),

    /// CSV import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Remote backend errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Notification errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored snapshot could not be decoded
    #[error("Stored state is corrupt: {0}")]
    Corrupt(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be determined or created
    #[error("Data directory unavailable at {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty after trimming
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    /// Minutes must be a positive whole number
    #[error("Estimated minutes must be positive, got {0}")]
    NonPositiveMinutes(i64),

    /// Referenced record does not exist
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        ValidationError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Focus session state machine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("A focus session is already running for task '{task_id}'")]
    AlreadyActive { task_id: String },

    #[error("No focus session is active")]
    NotActive,

    #[error("Focus session is not running")]
    NotRunning,

    #[error("Focus session is not paused")]
    NotPaused,
}

/// CSV import errors. Any of these aborts the whole import.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Not a CSV file: {0}")]
    NotCsv(PathBuf),

    #[error("CSV parsing error: {0}")]
    Parse(#[from] csv::Error),

    #[error("CSV file is empty")]
    Empty,

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Validation failed:\n{}", .0.join("\n"))]
    InvalidRows(Vec<String>),
}

/// Remote backend errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Invalid backend URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Not connected")]
    NotConnected,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

/// Notification errors. These degrade the feature, never the app.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotifyError {
    #[error("VAPID key not configured")]
    MissingServerKey,

    #[error("Invalid VAPID key: {0}")]
    InvalidServerKey(String),

    #[error("Notifications for '{0}' are disabled")]
    Disabled(&'static str),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
