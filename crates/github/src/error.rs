//! Error types for the GitHub client

use std::fmt;

/// Errors that can occur while talking to the GitHub REST API
#[derive(Debug)]
pub enum GithubError {
    /// No HTTP response (timeout, connection refused)
    RequestFailed { operation: String, message: String },

    /// Non-success HTTP status
    ApiError {
        operation: String,
        status: u16,
        message: String,
    },

    /// Successful status with a body we could not use
    InvalidResponse {
        operation: String,
        status: u16,
        message: String,
    },

    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for GithubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { operation, message } => {
                write!(f, "{operation} failed: {message}")
            }
            Self::ApiError {
                operation,
                status,
                message,
            } => write!(f, "{operation} returned {status}: {message}"),
            Self::InvalidResponse {
                operation, message, ..
            } => write!(f, "{operation} returned an unusable response: {message}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for GithubError {}

impl From<GithubError> for tsdocbot_core::error::Error {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::RequestFailed { operation, message } => {
                Self::host(operation, None, message)
            }
            GithubError::ApiError {
                operation,
                status,
                message,
            }
            | GithubError::InvalidResponse {
                operation,
                status,
                message,
            } => Self::host(operation, Some(status), message),
            GithubError::ConfigError(msg) => Self::config(msg),
        }
    }
}
