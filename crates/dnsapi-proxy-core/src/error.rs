//! Error types for the DNS API proxy
//!
//! Every failure is classified into an [`ErrorKind`], which the HTTP layer
//! turns into a status code. Messages of the client-facing kinds are sent
//! back to the caller verbatim, so they stay single-line.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for proxy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS API proxy
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or incomplete caller input
    #[error("{0}")]
    BadRequest(String),

    /// A name that cannot be split into subname and zone
    #[error("invalid fqdn: {0}")]
    InvalidFqdn(String),

    /// Record type or similar input the proxy does not handle
    #[error("{0}")]
    Unsupported(String),

    /// The caller is not permitted to modify the requested name
    #[error("unauthorized")]
    Unauthorized,

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Zone or record missing upstream
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The whole provider exchange exceeded its deadline
    #[error("Upstream timeout after {0:?}")]
    Timeout(Duration),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The connection's peer address could not be parsed
    #[error("invalid remote address: {0}")]
    InvalidRemoteAddr(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller sent something malformed (400)
    BadRequest,
    /// Caller asked for something the proxy does not support (400)
    Unsupported,
    /// Caller lacks a grant for the name (401)
    Unauthorized,
    /// Provider call failed or timed out (500)
    Upstream,
    /// Proxy-side failure (500)
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            Self::BadRequest | Self::Unsupported => 400,
            Self::Unauthorized => 401,
            Self::Upstream | Self::Internal => 500,
        }
    }

    /// Whether the error message is meant for the caller
    pub fn is_client_error(self) -> bool {
        matches!(self, Self::BadRequest | Self::Unsupported)
    }
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create an unsupported input error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) | Self::InvalidFqdn(_) => ErrorKind::BadRequest,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Provider { .. } | Self::NotFound(_) | Self::Timeout(_) | Self::Json(_) => {
                ErrorKind::Upstream
            }
            Self::InvalidRemoteAddr(_) | Self::Config(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
