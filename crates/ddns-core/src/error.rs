//! Error types for the DDNS updater
//!
//! Every failure in an update cycle maps onto one of four kinds (see
//! [`ErrorKind`]). Only configuration errors are fatal, and only at startup.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing or malformed startup values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input, rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Connection, DNS resolution or timeout failure on an outbound call
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Record not found at the provider
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-success status code
    #[error("Provider error ({provider}): HTTP status {status}: {message}")]
    Rejected {
        /// Provider name
        provider: String,
        /// HTTP status code returned by the provider
        status: u16,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration or bad input
    Validation,
    /// Network failure
    Transport,
    /// Malformed response
    Decode,
    /// Provider refused the request
    Rejected,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider rejection error
    pub fn rejected(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::InvalidInput(_) => ErrorKind::Validation,
            Error::Transport(_) | Error::Other(_) => ErrorKind::Transport,
            Error::Decode(_) | Error::Json(_) | Error::NotFound(_) => ErrorKind::Decode,
            Error::Rejected { .. } => ErrorKind::Rejected,
        }
    }

    /// HTTP status code, for provider rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
