//! Error types for timing file retrieval

use thiserror::Error;

/// Timeline errors
///
/// These never reach the player UI: the loader maps all of them to "no
/// segments". They exist so `TimingSource` implementations can report what
/// went wrong for logging.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Timings request to {url} returned status {status}")]
    Status { status: u16, url: String },

    /// Base URL or folder could not form a valid URL
    #[error("Invalid timings URL: {0}")]
    InvalidUrl(String),

    /// Timing source has nothing for this folder
    #[error("No timings for folder: {0}")]
    NotFound(String),

    /// Configuration parse error
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;
