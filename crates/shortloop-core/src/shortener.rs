use crate::error::ShortenError;
use async_trait::async_trait;

/// The shortening engine exposed to the protocol front-ends.
///
/// Implementations hold no mutable state of their own beyond delegating
/// to a [`Repository`](crate::Repository), so a single instance is shared
/// by every listener without an additional lock.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns the generated code.
    ///
    /// This is a single-attempt write: a collision on either uniqueness
    /// axis surfaces as [`ShortenError::AlreadyExists`] and is never
    /// retried internally.
    async fn shorten(&self, original_url: &str) -> Result<String, ShortenError>;

    /// Resolves a code back to its original URL.
    async fn resolve(&self, code: &str) -> Result<String, ShortenError>;
}
