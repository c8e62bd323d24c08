//! The serving lifecycle coordinator.
//!
//! Owns both protocol listeners as one unit: binds them before serving,
//! runs them concurrently, and on the first of {external trigger,
//! listener failure} drives a coordinated shutdown of both under a single
//! shared deadline.

use crate::grpc::{UrlShortenerGrpc, UrlShortenerServer};
use crate::http::{self, AppState};
use anyhow::Context;
use shortloop_core::Shortener;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{error, info, warn};

/// Lifecycle of the listener pair. Transitions are strictly forward:
/// `Starting -> Running -> ShuttingDown -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

/// Both listeners, bound but not yet serving.
///
/// Binding happens in [`Coordinator::bind`] so that a port conflict is a
/// fatal startup error, observed before any request is accepted.
pub struct Coordinator {
    http_listener: TcpListener,
    grpc_listener: TcpListener,
    router: axum::Router,
    grpc_service: UrlShortenerServer<UrlShortenerGrpc>,
    shutdown_timeout: Duration,
    state_tx: watch::Sender<LifecycleState>,
}

impl Coordinator {
    /// Binds both listeners against one shared engine handle.
    pub async fn bind(
        http_addr: SocketAddr,
        grpc_addr: SocketAddr,
        shortener: Arc<dyn Shortener>,
        shutdown_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_listener = TcpListener::bind(http_addr)
            .await
            .with_context(|| format!("failed to bind http listener on {http_addr}"))?;
        let grpc_listener = TcpListener::bind(grpc_addr)
            .await
            .with_context(|| format!("failed to bind grpc listener on {grpc_addr}"))?;

        let router = http::router(AppState::new(Arc::clone(&shortener)));
        let grpc_service = UrlShortenerServer::new(UrlShortenerGrpc::new(shortener));

        let (state_tx, _) = watch::channel(LifecycleState::Starting);

        Ok(Self {
            http_listener,
            grpc_listener,
            router,
            grpc_service,
            shutdown_timeout,
            state_tx,
        })
    }

    /// The address the HTTP listener is bound to.
    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    /// The address the gRPC listener is bound to.
    pub fn grpc_addr(&self) -> std::io::Result<SocketAddr> {
        self.grpc_listener.local_addr()
    }

    /// Subscribes to lifecycle state transitions.
    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Serves both listeners until a termination signal arrives.
    pub async fn run(self) {
        self.run_until(shutdown_signal()).await;
    }

    /// Serves both listeners until `trigger` resolves or either listener
    /// fails, then drains both concurrently under the shared deadline.
    pub async fn run_until(self, trigger: impl Future<Output = ()> + Send) {
        let Self {
            http_listener,
            grpc_listener,
            router,
            grpc_service,
            shutdown_timeout,
            state_tx,
        } = self;

        // One watch broadcast stops both listeners; the mpsc channel
        // fans in the first non-graceful listener failure.
        let (stop_tx, stop_rx) = watch::channel(false);
        let (fail_tx, mut fail_rx) = mpsc::channel::<anyhow::Error>(2);

        let mut http_task = spawn_http(http_listener, router, stop_rx.clone(), fail_tx.clone());
        let mut grpc_task = spawn_grpc(grpc_listener, grpc_service, stop_rx, fail_tx).await;

        let _ = state_tx.send(LifecycleState::Running);
        info!("both listeners running");

        tokio::select! {
            _ = trigger => {
                info!("shutdown requested, starting graceful shutdown");
            }
            Some(err) = fail_rx.recv() => {
                error!(%err, "listener failed, shutting down both listeners");
            }
        }

        let _ = state_tx.send(LifecycleState::ShuttingDown);
        let _ = stop_tx.send(true);

        // Both drains run concurrently against one deadline; a slow
        // listener never delays the other.
        let deadline = Instant::now() + shutdown_timeout;
        tokio::join!(
            drain("http", &mut http_task, deadline),
            drain("grpc", &mut grpc_task, deadline),
        );

        let _ = state_tx.send(LifecycleState::Stopped);
        info!("shutdown complete");
    }
}

fn spawn_http(
    listener: TcpListener,
    router: axum::Router,
    mut stop_rx: watch::Receiver<bool>,
    fail_tx: mpsc::Sender<anyhow::Error>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.changed().await;
            })
            .await;

        if let Err(err) = result {
            let _ = fail_tx
                .send(anyhow::Error::new(err).context("http server error"))
                .await;
        }
    })
}

async fn spawn_grpc(
    listener: TcpListener,
    service: UrlShortenerServer<UrlShortenerGrpc>,
    mut stop_rx: watch::Receiver<bool>,
    fail_tx: mpsc::Sender<anyhow::Error>,
) -> JoinHandle<()> {
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<UrlShortenerServer<UrlShortenerGrpc>>()
        .await;

    tokio::spawn(async move {
        let result = tonic::transport::Server::builder()
            .add_service(health_service)
            .add_service(service)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                let _ = stop_rx.changed().await;
            })
            .await;

        if let Err(err) = result {
            let _ = fail_tx
                .send(anyhow::Error::new(err).context("grpc server error"))
                .await;
        }
    })
}

/// Waits for one listener task to finish draining, bounded by the shared
/// deadline. Missing the deadline is logged and the task aborted, never
/// escalated to an error.
async fn drain(name: &'static str, task: &mut JoinHandle<()>, deadline: Instant) {
    match tokio::time::timeout_at(deadline, &mut *task).await {
        Ok(Ok(())) => info!(listener = name, "listener shut down gracefully"),
        Ok(Err(err)) => error!(listener = name, %err, "listener task failed during shutdown"),
        Err(_) => {
            warn!(
                listener = name,
                "listener did not drain within the shutdown deadline"
            );
            task.abort();
        }
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to listen for interrupt signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(%err, "failed to install termination signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
