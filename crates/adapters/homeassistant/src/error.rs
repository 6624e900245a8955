//! Adapter-specific error type wrapping reqwest errors.

use tally_domain::error::TallyError;

/// Errors originating from the Home Assistant REST API.
#[derive(Debug, thiserror::Error)]
pub enum HaError {
    /// The request could not be sent or the response body not decoded.
    #[error("http error")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The configured entity does not exist.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The configured token was not accepted when building the client.
    #[error("invalid api token")]
    InvalidToken,
}

impl From<HaError> for TallyError {
    fn from(err: HaError) -> Self {
        Self::Storage(Box::new(err))
    }
}
