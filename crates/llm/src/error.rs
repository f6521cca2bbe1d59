//! Error types for comment synthesis

use std::fmt;

/// Errors that can occur while talking to a language model
#[derive(Debug)]
pub enum LlmError {
    /// The request never produced an HTTP response (timeout, connection)
    RequestFailed(String),

    /// The API answered with a non-success status
    ApiError { status: u16, message: String },

    /// The response could not be decoded or had no usable content
    InvalidResponse(String),

    /// Configuration error
    ConfigError(String),
}

impl LlmError {
    /// Network failures, rate limiting and server errors are worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::ApiError { status, .. } => *status == 429 || (500..600).contains(status),
            Self::InvalidResponse(_) | Self::ConfigError(_) => false,
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed(msg) => write!(f, "Request failed: {msg}"),
            Self::ApiError { status, message } => write!(f, "API returned {status}: {message}"),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<LlmError> for tsdocbot_core::error::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ConfigError(msg) => Self::config(msg),
            other if other.is_transient() => Self::transient_synthesis(other.to_string()),
            other => Self::synthesis(other.to_string()),
        }
    }
}
