//! Error types for the fetch layer.

use thiserror::Error;

/// Errors that can occur while resolving a song against the remote
/// provider and the local library.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider request timed out.
    #[error("lyrics provider timed out")]
    Timeout,

    /// The provider returned a non-success status.
    #[error("HTTP {status} from lyrics provider: {message}")]
    Http { status: u16, message: String },

    /// A provider response could not be parsed.
    #[error("parse error from lyrics provider: {message}")]
    Parse { message: String },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(reqwest::Error),

    /// An error propagated from the core domain layer.
    #[error("database error: {0}")]
    Database(#[from] strophe_core::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

impl FetchError {
    /// Returns `true` when the provider timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` for transport-level failures that are reported
    /// and swallowed at the top level rather than aborting the run.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Http { .. } | Self::Request(_))
    }

    /// Returns `true` when the query itself was invalid (empty title).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Database(strophe_core::Error::InvalidData(_)))
    }
}

/// Convenience alias for fetch results.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
