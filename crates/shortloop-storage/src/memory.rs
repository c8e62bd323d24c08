use async_trait::async_trait;
use shortloop_core::{Repository, StorageError};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Both lookup directions, kept consistent under one lock.
#[derive(Debug, Default)]
struct Tables {
    code_to_url: HashMap<String, String>,
    url_to_code: HashMap<String, String>,
}

/// In-memory implementation of the `Repository` trait.
///
/// A single `RwLock` guards the map pair so `put` can check both
/// uniqueness axes and write both directions atomically; `get` only needs
/// the shared read guard. This is the reference implementation and the
/// default when no external backend is configured.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn put(&self, original_url: &str, code: &str) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;

        debug!(url = %original_url, %code, "storage.put");

        if tables.code_to_url.contains_key(code) || tables.url_to_code.contains_key(original_url) {
            return Err(StorageError::AlreadyExists);
        }

        tables
            .code_to_url
            .insert(code.to_owned(), original_url.to_owned());
        tables
            .url_to_code
            .insert(original_url.to_owned(), code.to_owned());

        Ok(())
    }

    async fn get(&self, code: &str) -> Result<String, StorageError> {
        let tables = self.tables.read().await;

        debug!(%code, "storage.get");

        tables
            .code_to_url
            .get(code)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}
