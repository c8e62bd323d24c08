use async_trait::async_trait;
use shortloop_core::{Repository, StorageError};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{debug, warn};

const MAX_CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Storage contract: one table keyed by the short code, with the original
/// URL unique as well. Preserved for compatibility with existing data.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS urlshortener (
        short_url TEXT NOT NULL PRIMARY KEY,
        url TEXT NOT NULL UNIQUE
    )
"#;

/// Postgres implementation of the repository contract.
///
/// The pool is established once at startup through a bounded retry loop;
/// exhausting the retry budget is a fatal startup error and the
/// repository is never constructed half-connected. After startup no
/// reconnection is attempted inside `put`/`get` beyond the pool's own
/// management; transient connectivity loss surfaces as `Unavailable`.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing connection pool.
    ///
    /// The pool is assumed to be reachable; no schema bootstrap is run.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool, retrying up to [`MAX_CONNECT_ATTEMPTS`]
    /// times with [`CONNECT_RETRY_DELAY`] between attempts, then ensures
    /// the `urlshortener` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let mut last_err = None;

        for attempt in 1..=MAX_CONNECT_ATTEMPTS {
            match PgPoolOptions::new().connect(database_url).await {
                Ok(pool) => {
                    sqlx::query(CREATE_TABLE)
                        .execute(&pool)
                        .await
                        .map_err(map_sqlx_error)?;
                    return Ok(Self::new(pool));
                }
                Err(err) => {
                    warn!(attempt, max = MAX_CONNECT_ATTEMPTS, %err, "failed to connect to postgres, retrying");
                    last_err = Some(err);
                    if attempt < MAX_CONNECT_ATTEMPTS {
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(StorageError::Unavailable(format!(
            "failed to connect to postgres after {} attempts: {}",
            MAX_CONNECT_ATTEMPTS,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    StorageError::Unavailable(err.to_string())
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn put(&self, original_url: &str, code: &str) -> Result<(), StorageError> {
        debug!(url = %original_url, %code, "storage.put");

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO urlshortener (url, short_url)
            VALUES ($1, $2)
            "#,
        )
        .bind(original_url)
        .bind(code)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => tx.commit().await.map_err(map_sqlx_error),
            Err(err) if is_unique_violation(&err) => {
                let _ = tx.rollback().await;
                Err(StorageError::AlreadyExists)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(map_sqlx_error(err))
            }
        }
    }

    async fn get(&self, code: &str) -> Result<String, StorageError> {
        debug!(%code, "storage.get");

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(
            r#"
            SELECT url
            FROM urlshortener
            WHERE short_url = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            let _ = tx.rollback().await;
            return Err(StorageError::NotFound);
        };

        let url: String = row.try_get("url").map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(url)
    }
}
