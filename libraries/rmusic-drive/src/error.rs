//! Error types for the drive client.

use thiserror::Error;

/// Errors that can occur when talking to the drive API.
#[derive(Error, Debug)]
pub enum DriveClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("Drive error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Credential was rejected even after a fresh one was requested
    #[error("Authentication required")]
    AuthRequired,

    /// Credential provider has no token to give
    #[error("Credential unavailable: {0}")]
    CredentialUnavailable(String),

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// API is offline or unreachable
    #[error("Drive unreachable: {0}")]
    Unreachable(String),
}

impl DriveClientError {
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

impl From<DriveClientError> for rmusic_core::RMusicError {
    fn from(err: DriveClientError) -> Self {
        match err {
            DriveClientError::Status {
                status: 404,
                message,
            } => rmusic_core::RMusicError::not_found("file", message),
            other => rmusic_core::RMusicError::transport(other.to_string()),
        }
    }
}

/// Result type for drive client operations.
pub type Result<T> = std::result::Result<T, DriveClientError>;
