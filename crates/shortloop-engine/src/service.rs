use crate::generator::Generator;
use async_trait::async_trait;
use shortloop_core::{Repository, ShortenError, Shortener, StorageError};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A concrete implementation of the `Shortener` trait.
///
/// Wraps a `Repository` and a `Generator`. `shorten` is a single-attempt
/// write: when the generated code collides with an existing one the call
/// fails with `AlreadyExists`, exactly as it does for an already-shortened
/// URL. Callers wanting regeneration must retry at a higher layer.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService`.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<String, ShortenError> {
        info!(url = %original_url, "shorten url");

        let code = self.generator.generate()?;

        match self.repository.put(original_url, &code).await {
            Ok(()) => Ok(code),
            Err(StorageError::AlreadyExists) => {
                debug!(url = %original_url, "url already shortened");
                Err(ShortenError::AlreadyExists)
            }
            Err(err) => {
                error!(url = %original_url, %err, "shorten failed");
                Err(err.into())
            }
        }
    }

    async fn resolve(&self, code: &str) -> Result<String, ShortenError> {
        info!(%code, "resolve url");

        match self.repository.get(code).await {
            Ok(url) => Ok(url),
            Err(StorageError::NotFound) => {
                debug!(%code, "code not found");
                Err(ShortenError::NotFound)
            }
            Err(err) => {
                error!(%code, %err, "resolve failed");
                Err(err.into())
            }
        }
    }
}
