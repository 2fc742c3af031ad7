use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}")]
    Status { status: u16 },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Transport-level failure, as opposed to a payload the adapter could
    /// not make sense of.
    pub fn is_unavailable(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            Self::Http(_) => true,
            Self::Status { .. } | Self::Timeout(_) => true,
            #[cfg(feature = "http")]
            Self::Json(_) => false,
            Self::Malformed(_) => false,
        }
    }
}
