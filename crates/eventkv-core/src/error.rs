//! Error types for eventkv operations.
//!
//! Storage errors are classified into a closed set of kinds at the point of
//! detection; higher layers may add context but never change the kind.

use thiserror::Error;

/// Result type alias for eventkv operations.
pub type EventKvResult<T> = Result<T, EventKvError>;

/// Main error type for all eventkv operations.
#[derive(Error, Debug)]
pub enum EventKvError {
    /// No snapshot row matched the requested `(key, user_id)`.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// A snapshot already exists for the `(key, user_id)` being created.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The operation exceeded its deadline.
    #[error("timeout: {message}")]
    Timeout {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage engine failure not otherwise classified.
    #[error("database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed input, raised by the boundary layer.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EventKvError {
    /// Create a not found error for a `(key, user_id)` pair.
    pub fn not_found(key: &str, user_id: &str) -> Self {
        Self::NotFound {
            message: format!("no record for key '{}' and user '{}'", key, user_id),
        }
    }

    /// Create a conflict error for a `(key, user_id)` pair.
    pub fn conflict(key: &str, user_id: &str) -> Self {
        Self::Conflict {
            message: format!("key '{}' already exists for user '{}'", key, user_id),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Prefix the message with operation context, preserving the error kind.
    pub fn annotate(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::NotFound { message } => Self::NotFound {
                message: format!("{}: {}", context, message),
            },
            Self::Conflict { message } => Self::Conflict {
                message: format!("{}: {}", context, message),
            },
            Self::Timeout { message, source } => Self::Timeout {
                message: format!("{}: {}", context, message),
                source,
            },
            Self::Database { message, source } => Self::Database {
                message: format!("{}: {}", context, message),
                source,
            },
            Self::Validation { message } => Self::Validation {
                message: format!("{}: {}", context, message),
            },
            other => other,
        }
    }
}

impl From<rusqlite::Error> for EventKvError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => Self::Timeout {
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
            _ => Self::Database {
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
        }
    }
}
