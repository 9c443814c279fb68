//! Error types for ebook-sync-media.
//!
//! Resolution and lookup report "nothing found" with `Option`. These errors
//! only surface when an origin is configured or a listing is decoded.

use thiserror::Error;

/// Result type for ebook-sync-media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ebook-sync-media operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A configured API or storage base URL cannot be used.
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A media listing could not be decoded.
    #[error("Invalid media listing: {0}")]
    Listing(String),

    /// Error from the shared types crate.
    #[error(transparent)]
    Common(#[from] ebook_sync_common::Error),
}

impl Error {
    /// Create an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Listing(err.to_string())
    }
}
