//! Error types for the Rivet client core

use thiserror::Error;

/// Main error type for Rivet client operations
#[derive(Debug, Error)]
pub enum RivetError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status} for {path}: {body}")]
    Status {
        /// Request path (e.g. "/chat")
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing required field in a backend response
    #[error("Missing required field '{field}' in {context}")]
    MissingField {
        /// Field name
        field: String,
        /// Response the field was expected in
        context: String,
    },

    /// An option list came back empty
    #[error("No {0} available from the backend")]
    EmptyOptions(String),

    /// Application-level failure reported by the backend, kept verbatim
    #[error("{0}")]
    Rejected(String),

    /// Operation not allowed in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using RivetError
pub type Result<T> = std::result::Result<T, RivetError>;

impl RivetError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        RivetError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        RivetError::Validation(msg.into())
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        RivetError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an empty options error
    pub fn empty_options(list: impl Into<String>) -> Self {
        RivetError::EmptyOptions(list.into())
    }

    /// Create a rejected error carrying the backend's message
    pub fn rejected(msg: impl Into<String>) -> Self {
        RivetError::Rejected(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        RivetError::InvalidState(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        RivetError::Other(msg.into())
    }

    /// True when the backend itself refused the request (as opposed to a
    /// transport or decoding failure)
    pub fn is_rejection(&self) -> bool {
        matches!(self, RivetError::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RivetError::validation("bad name");
        assert_eq!(err.to_string(), "Validation error: bad name");

        let err = RivetError::missing_field("options", "/options response");
        assert_eq!(
            err.to_string(),
            "Missing required field 'options' in /options response"
        );
    }

    #[test]
    fn test_rejected_is_verbatim() {
        let err = RivetError::rejected("Configuration already exists");
        assert_eq!(err.to_string(), "Configuration already exists");
        assert!(err.is_rejection());
        assert!(!RivetError::other("x").is_rejection());
    }

    #[test]
    fn test_status_display() {
        let err = RivetError::Status {
            path: "/chat".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 500 for /chat: boom");
    }
}
