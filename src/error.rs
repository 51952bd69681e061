//! Error types and handling for Nettleie
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Nettleie operations
pub type Result<T> = std::result::Result<T, NettleieError>;

/// Main error type for Nettleie
#[derive(Debug, Error)]
pub enum NettleieError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport-level errors (connection, DNS, non-2xx status)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Per-attempt timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Payload decode errors (malformed JSON, missing expected keys)
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Authentication errors against the tariff API
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// HTTP method not supported by the executor
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl NettleieError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        NettleieError::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        NettleieError::Network {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        NettleieError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        NettleieError::Parse {
            message: message.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        NettleieError::Auth {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        NettleieError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported-method error
    pub fn unsupported_method<S: Into<String>>(method: S) -> Self {
        NettleieError::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        NettleieError::Io {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        NettleieError::Generic {
            message: message.into(),
        }
    }

    /// Whether the executor may retry the failed attempt.
    ///
    /// Only transport-class failures participate in the retry loop; decode
    /// and contract errors propagate immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NettleieError::Network { .. } | NettleieError::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for NettleieError {
    fn from(err: std::io::Error) -> Self {
        NettleieError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for NettleieError {
    fn from(err: serde_yaml::Error) -> Self {
        NettleieError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for NettleieError {
    fn from(err: serde_json::Error) -> Self {
        NettleieError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for NettleieError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NettleieError::timeout(err.to_string())
        } else if err.is_decode() {
            NettleieError::parse(err.to_string())
        } else {
            NettleieError::network(err.to_string())
        }
    }
}

impl From<chrono::ParseError> for NettleieError {
    fn from(err: chrono::ParseError) -> Self {
        NettleieError::validation("datetime", &err.to_string())
    }
}
