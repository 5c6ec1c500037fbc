//! Error types for Redomi.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using Redomi's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Redomi.
#[derive(Error, Debug)]
pub enum Error {
    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    // Resolution errors
    #[error("Unsupported or malformed link: {0}")]
    MalformedInput(String),

    #[error("No song found for {0}")]
    NotFound(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // Generic errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// HTTP-specific errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed with status {status}: {message}")]
    StatusError { status: u16, message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,
}

/// Coarse failure category reported to observers of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The aggregation service was unreachable, timed out or refused the request.
    Network,
    /// The input is not a link the service understands.
    MalformedInput,
    /// The service could not identify a song behind the link.
    NotFound,
    /// The response did not match the expected schema.
    Decode,
}

impl Error {
    /// Returns true if this error is retryable.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::RateLimited { .. }
                | Self::Http(HttpError::ConnectionFailed(_) | HttpError::Timeout)
        )
    }

    /// Category of a resolver failure, `None` for errors that did not come
    /// from talking to the aggregation service.
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::MalformedInput(_) => Some(ErrorKind::MalformedInput),
            Self::Http(_) | Self::Network(_) | Self::RateLimited { .. } => Some(ErrorKind::Network),
            Self::NotFound(_) => Some(ErrorKind::NotFound),
            Self::Decode(_) => Some(ErrorKind::Decode),
            Self::InvalidArgument(_) | Self::Cancelled => None,
        }
    }
}
