//! Error types for the Earnwatch dashboard.

use thiserror::Error;

/// Result type alias using the Earnwatch error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Earnwatch components.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request (rejected before any network call)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport/network failure (connection refused, timeout, DNS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream returned a non-success HTTP status
    #[error("Upstream error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap any transport-level failure.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Check if this error came from the network rather than the upstream
    /// application.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a not-found error.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an input-validation rejection.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Get the HTTP status code associated with this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Http { status, .. } => *status,
            _ => 500,
        }
    }
}
