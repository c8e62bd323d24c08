//! Integration tests for the dual-listener serving lifecycle.
//!
//! Each test binds both listeners on ephemeral ports, serves real HTTP
//! and gRPC traffic, and drives shutdown through the same path the signal
//! handler uses.

use serde_json::json;
use shortloop_core::Shortener;
use shortloop_engine::{RandomGenerator, ShortenerService};
use shortloop_proto_schema::v1 as proto;
use shortloop_proto_schema::v1::url_shortener_client::UrlShortenerClient;
use shortloop_server::lifecycle::{Coordinator, LifecycleState};
use shortloop_storage::InMemoryRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

struct Running {
    http_addr: SocketAddr,
    grpc_addr: SocketAddr,
    state: watch::Receiver<LifecycleState>,
    trigger: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

async fn start(shutdown_timeout: Duration) -> Running {
    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::new(
        InMemoryRepository::new(),
        RandomGenerator::new(10).unwrap(),
    ));

    let coordinator = Coordinator::bind(
        "127.0.0.1:0".parse().unwrap(),
        "127.0.0.1:0".parse().unwrap(),
        shortener,
        shutdown_timeout,
    )
    .await
    .unwrap();

    let http_addr = coordinator.http_addr().unwrap();
    let grpc_addr = coordinator.grpc_addr().unwrap();
    let mut state = coordinator.state();

    let (trigger, rx) = oneshot::channel();
    let handle = tokio::spawn(coordinator.run_until(async {
        let _ = rx.await;
    }));

    state
        .wait_for(|s| *s == LifecycleState::Running)
        .await
        .unwrap();

    Running {
        http_addr,
        grpc_addr,
        state,
        trigger,
        handle,
    }
}

#[tokio::test]
async fn both_protocols_serve_the_same_registry() {
    let server = start(Duration::from_secs(10)).await;

    // Shorten over HTTP.
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/shorten", server.http_addr))
        .json(&json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    let code = body["short_url"].as_str().unwrap().to_string();

    // Resolve the same code over gRPC.
    let mut grpc = UrlShortenerClient::connect(format!("http://{}", server.grpc_addr))
        .await
        .unwrap();
    let resolved = grpc
        .resolve(proto::ResolveRequest {
            short_url: code.clone(),
        })
        .await
        .unwrap();
    assert_eq!(resolved.get_ref().original_url, "https://example.com");

    // And the other direction: a second shorten over gRPC conflicts.
    let status = grpc
        .shorten(proto::ShortenRequest {
            url: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::AlreadyExists);

    let _ = server.trigger.send(());
    server.handle.await.unwrap();
    assert_eq!(*server.state.borrow(), LifecycleState::Stopped);
}

#[tokio::test]
async fn shutdown_stops_both_listeners_within_the_deadline() {
    let server = start(Duration::from_secs(10)).await;

    let started = std::time::Instant::now();
    let _ = server.trigger.send(());
    server.handle.await.unwrap();

    // Idle listeners drain immediately; well inside deadline + epsilon.
    assert!(started.elapsed() < Duration::from_secs(11));
    assert_eq!(*server.state.borrow(), LifecycleState::Stopped);

    // Neither protocol accepts new work after Stopped.
    let http_err = reqwest::Client::new()
        .get(format!("http://{}/health", server.http_addr))
        .send()
        .await;
    assert!(http_err.is_err());

    let grpc_err = UrlShortenerClient::connect(format!("http://{}", server.grpc_addr)).await;
    assert!(grpc_err.is_err());
}

#[tokio::test]
async fn state_transitions_run_forward() {
    fn rank(state: LifecycleState) -> u8 {
        match state {
            LifecycleState::Starting => 0,
            LifecycleState::Running => 1,
            LifecycleState::ShuttingDown => 2,
            LifecycleState::Stopped => 3,
        }
    }

    let server = start(Duration::from_secs(10)).await;
    let mut state = server.state.clone();

    let watcher = tokio::spawn(async move {
        let mut states = vec![*state.borrow_and_update()];
        while state.changed().await.is_ok() {
            states.push(*state.borrow_and_update());
        }
        states
    });

    let _ = server.trigger.send(());
    server.handle.await.unwrap();

    // A watch receiver may coalesce intermediate values, but whatever it
    // observes must run strictly forward and end at Stopped.
    let states = watcher.await.unwrap();
    assert_eq!(states.first(), Some(&LifecycleState::Running));
    assert_eq!(states.last(), Some(&LifecycleState::Stopped));
    assert!(states.windows(2).all(|w| rank(w[0]) < rank(w[1])));
}

#[tokio::test]
async fn bind_conflict_aborts_startup() {
    let server = start(Duration::from_secs(10)).await;

    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::new(
        InMemoryRepository::new(),
        RandomGenerator::new(10).unwrap(),
    ));

    // Reusing the live HTTP port must fail before Running.
    let result = Coordinator::bind(
        server.http_addr,
        "127.0.0.1:0".parse().unwrap(),
        shortener,
        Duration::from_secs(10),
    )
    .await;
    assert!(result.is_err());

    let _ = server.trigger.send(());
    server.handle.await.unwrap();
}

#[tokio::test]
async fn hung_listener_is_abandoned_at_the_deadline() {
    use tokio::io::AsyncWriteExt;

    let deadline = Duration::from_millis(500);
    let server = start(deadline).await;

    // A half-written request parks the connection: axum's graceful
    // shutdown cannot finish draining while it stays open.
    let mut stuck = tokio::net::TcpStream::connect(server.http_addr)
        .await
        .unwrap();
    stuck
        .write_all(b"POST /shorten HTTP/1.1\r\nContent-Length: 100\r\n\r\n")
        .await
        .unwrap();

    let started = std::time::Instant::now();
    let _ = server.trigger.send(());
    server.handle.await.unwrap();

    // Stopped is reached within deadline + epsilon anyway; the hung
    // listener is aborted, not waited out.
    assert!(started.elapsed() < deadline + Duration::from_secs(2));
    assert_eq!(*server.state.borrow(), LifecycleState::Stopped);

    drop(stuck);
}

#[tokio::test]
async fn in_flight_requests_complete_during_shutdown() {
    let server = start(Duration::from_secs(10)).await;

    // Open a gRPC connection before shutdown begins, then race the
    // request against the stop broadcast.
    let mut grpc = UrlShortenerClient::connect(format!("http://{}", server.grpc_addr))
        .await
        .unwrap();

    let request = tokio::spawn(async move {
        grpc.shorten(proto::ShortenRequest {
            url: "https://example.com".to_string(),
        })
        .await
    });

    tokio::task::yield_now().await;
    let _ = server.trigger.send(());

    // The request was admitted before shutdown began; graceful shutdown
    // lets it complete instead of dropping it mid-flight.
    let response = request.await.unwrap().unwrap();
    assert_eq!(response.get_ref().short_url.len(), 10);

    server.handle.await.unwrap();
    assert_eq!(*server.state.borrow(), LifecycleState::Stopped);
}
