//! Error types for the player core

use thiserror::Error;

/// Playback errors
///
/// Operations on the player never fail outward; these describe failures at
/// the platform seams (audio element, analysis graph, storage) so they can
/// be logged before being degraded.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Audio element refused to start
    #[error("Play rejected: {0}")]
    PlayRejected(String),

    /// Audio element error
    #[error("Audio element error: {0}")]
    AudioElement(String),

    /// Frequency analysis unavailable
    #[error("Analyser unavailable: {0}")]
    AnalyserUnavailable(String),

    /// Item id not present in the queue
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Configuration parse error
    #[error(transparent)]
    Config(#[from] toml::de::Error),

    /// Error from the core crate
    #[error(transparent)]
    Core(#[from] cyfral_core::CyfralError),

    /// Error from the timeline crate
    #[error(transparent)]
    Timeline(#[from] cyfral_timeline::TimelineError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
