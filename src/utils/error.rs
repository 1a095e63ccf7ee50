//! Error handling for the gateway
//!
//! Every failure mode visible to a client is expressed here. The
//! authorization pipeline itself never surfaces raw errors; denials carry a
//! short sanitized message in a `{"message": ...}` JSON body.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GateError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication errors (missing or invalid credentials)
    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    /// Authorization errors (authenticated but not permitted)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict errors (e.g. duplicate canonical path or role name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Collaborator lookup failures (user directory, backing stores)
    #[error("Directory error: {0}")]
    Directory(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl GateError {
    /// Create an authentication error
    pub fn unauthenticated<S: Into<String>>(msg: S) -> Self {
        GateError::Unauthenticated(msg.into())
    }

    /// Create an authorization error
    pub fn forbidden<S: Into<String>>(msg: S) -> Self {
        GateError::Forbidden(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        GateError::Internal(msg.into())
    }
}

impl ResponseError for GateError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            GateError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GateError::Forbidden(_) => StatusCode::FORBIDDEN,
            GateError::NotFound(_) => StatusCode::NOT_FOUND,
            GateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GateError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Internal detail stays in the logs, not in the response body.
            GateError::Config(_)
            | GateError::Yaml(_)
            | GateError::Io(_)
            | GateError::Serialization(_)
            | GateError::Directory(_)
            | GateError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "message": message }))
    }
}
