//! Error types for the provider module.

use thiserror::Error;

/// Errors that can occur when talking to the meeting-bot provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request timed out.
    #[error("Provider request timed out")]
    Timeout,

    /// Could not connect to the provider.
    #[error("Failed to connect to provider: {0}")]
    ConnectionFailed(String),

    /// Provider rejected our credentials.
    #[error("Provider authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider returned an API-level error.
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Provider response could not be parsed.
    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    /// The requested notetaker job does not exist.
    #[error("Notetaker not found: {0}")]
    NotFound(String),
}

impl ProviderError {
    /// Map a reqwest error into the provider taxonomy.
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else {
            Self::ApiError(e.to_string())
        }
    }
}
