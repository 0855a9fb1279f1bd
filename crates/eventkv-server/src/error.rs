//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use eventkv_core::EventKvError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, "TIMEOUT", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from core errors; the kind decides the status, the message passes
// through untouched.
impl From<EventKvError> for ApiError {
    fn from(err: EventKvError) -> Self {
        match err {
            EventKvError::NotFound { message } => ApiError::not_found(message),
            EventKvError::Conflict { message } => ApiError::conflict(message),
            EventKvError::Timeout { message, .. } => ApiError::timeout(message),
            EventKvError::Validation { message } => ApiError::validation(message),
            EventKvError::Database { message, .. } => {
                ApiError::internal(format!("database error: {}", message))
            }
            EventKvError::Configuration(msg) => {
                ApiError::internal(format!("configuration error: {}", msg))
            }
            EventKvError::Io(e) => ApiError::internal(format!("io error: {}", e)),
            EventKvError::Serialization(e) => {
                ApiError::internal(format!("serialization error: {}", e))
            }
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status_mapping() {
        let err = ApiError::from(EventKvError::not_found("name", "u1"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = ApiError::from(EventKvError::conflict("name", "u1"));
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = ApiError::from(EventKvError::validation("key is empty"));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(EventKvError::database("disk full"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_passes_through() {
        let err = ApiError::from(EventKvError::not_found("name", "u1"));
        assert!(err.message.contains("'name'"));
        assert!(err.message.contains("'u1'"));
    }
}
