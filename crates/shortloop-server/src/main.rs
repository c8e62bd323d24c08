use anyhow::Context;
use clap::Parser;
use shortloop_core::Shortener;
use shortloop_engine::{RandomGenerator, ShortenerService};
use shortloop_server::cli::{Cli, StorageBackendArg};
use shortloop_server::lifecycle::Coordinator;
use shortloop_storage::{InMemoryRepository, PostgresRepository};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse();

    info!(
        http_listen_addr = %config.http_listen_addr,
        grpc_listen_addr = %config.grpc_listen_addr,
        storage_backend = %config.storage,
        code_length = config.code_length,
        "starting shortloop"
    );

    let generator =
        RandomGenerator::new(config.code_length).context("invalid code length")?;

    match config.storage {
        StorageBackendArg::Memory => {
            let shortener = ShortenerService::new(InMemoryRepository::new(), generator);
            serve(&config, Arc::new(shortener)).await
        }
        StorageBackendArg::Postgres => {
            let url = config
                .postgres_url()
                .context("postgres configuration is incomplete")?;
            let repository = PostgresRepository::connect(&url)
                .await
                .context("failed to initialize storage")?;
            info!("initialized postgres storage");
            let shortener = ShortenerService::new(repository, generator);
            serve(&config, Arc::new(shortener)).await
        }
    }
}

async fn serve(config: &Cli, shortener: Arc<dyn Shortener>) -> anyhow::Result<()> {
    let coordinator = Coordinator::bind(
        config.http_listen_addr,
        config.grpc_listen_addr,
        shortener,
        Duration::from_secs(config.shutdown_timeout_secs),
    )
    .await?;

    coordinator.run().await;
    Ok(())
}
