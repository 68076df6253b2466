use thiserror::Error;

/// Top-level error type for HeartSpace.
///
/// Collaborator failures (storage, media, I/O) and user-correctable
/// validation failures share this type so the API layer can map each
/// variant to one HTTP status. The chat engine has its own `ChatError`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HeartspaceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Payload too large: {size} bytes exceeds {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HeartspaceError {
    /// True for failures the user can fix by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            HeartspaceError::Validation(_)
                | HeartspaceError::Conflict(_)
                | HeartspaceError::PayloadTooLarge { .. }
        )
    }
}

impl From<toml::de::Error> for HeartspaceError {
    fn from(err: toml::de::Error) -> Self {
        HeartspaceError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HeartspaceError {
    fn from(err: toml::ser::Error) -> Self {
        HeartspaceError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HeartspaceError {
    fn from(err: serde_json::Error) -> Self {
        HeartspaceError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for HeartSpace operations.
pub type Result<T> = std::result::Result<T, HeartspaceError>;
