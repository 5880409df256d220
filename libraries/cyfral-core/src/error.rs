/// Core error types for Cyfral Player
use thiserror::Error;

/// Result type alias using `CyfralError`
pub type Result<T> = std::result::Result<T, CyfralError>;

/// Core error type for Cyfral Player
#[derive(Error, Debug)]
pub enum CyfralError {
    /// Record storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catalog definition errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Configuration parse errors
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

impl CyfralError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
