use thiserror::Error;

/// Errors produced by a [`Repository`](crate::Repository) backend.
///
/// `AlreadyExists` and `NotFound` are expected outcomes of normal
/// operation; `Unavailable` carries the underlying backend failure.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("mapping already exists")]
    AlreadyExists,
    #[error("mapping not found")]
    NotFound,
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by a code generator.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("code length must be greater than zero")]
    InvalidLength,
}

/// Errors surfaced by the [`Shortener`](crate::Shortener) engine.
#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    /// The original URL was already shortened, or the generated code
    /// collided with an existing one. The two cases are deliberately
    /// reported identically.
    #[error("url already exists")]
    AlreadyExists,
    #[error("url does not exist")]
    NotFound,
    #[error("failed to generate short code: {0}")]
    GenerationFailed(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl From<GenerateError> for ShortenError {
    fn from(value: GenerateError) -> Self {
        Self::GenerationFailed(value.to_string())
    }
}

impl From<StorageError> for ShortenError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::AlreadyExists => Self::AlreadyExists,
            StorageError::NotFound => Self::NotFound,
            StorageError::Unavailable(cause) => Self::Unavailable(cause),
        }
    }
}
