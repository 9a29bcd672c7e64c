//! Custom error types for triad
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for triad operations
#[derive(Error, Debug)]
pub enum TriadError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error response from the remote backend
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Transport-level failure talking to the remote backend
    #[error("HTTP error: {0}")]
    Http(String),

    /// The operation needs a signed-in user
    #[error("Sign in required: {0}")]
    SessionRequired(String),
}

impl TriadError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a remote error from a status code and message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from talking to the remote backend
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Http(_))
    }
}

impl From<std::io::Error> for TriadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TriadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for TriadError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::remote(status.as_u16(), err.to_string()),
            None => Self::Http(err.to_string()),
        }
    }
}

/// Result type alias for triad operations
pub type TriadResult<T> = Result<T, TriadError>;
