use crate::error::StorageError;
use async_trait::async_trait;

/// The registry backend capability.
///
/// A repository owns the full set of `original_url <-> code` mappings for
/// the process lifetime. Entries are inserted once and read many times;
/// there is no update or delete path.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Inserts the pair atomically.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if either `original_url`
    /// or `code` already occurs in the registry, checked atomically with
    /// the insert.
    async fn put(&self, original_url: &str, code: &str) -> Result<(), StorageError>;

    /// Looks up the original URL for a code. Pure lookup, no side effects.
    ///
    /// Fails with [`StorageError::NotFound`] when the code was never
    /// inserted.
    async fn get(&self, code: &str) -> Result<String, StorageError>;
}
