#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::{sleep, timeout};

use usage_core::{LabelKey, UsageError};
use usage_gateway::{
    app_state::AppState,
    config::UsageConfig,
    obs::metrics::CounterRegistry,
    router,
    server::{DrainOutcome, Phase, Server},
};

const BODY: &str = r#"{"user":"alice","groups":"eng","path":"/v1/chat"}"#;

async fn start(grace: Duration) -> (Server, SocketAddr, Arc<CounterRegistry>) {
    start_with(UsageConfig {
        drain_grace: grace,
        ..UsageConfig::default()
    })
    .await
}

async fn start_with(cfg: UsageConfig) -> (Server, SocketAddr, Arc<CounterRegistry>) {
    let registry = Arc::new(CounterRegistry::new());
    let state = AppState::with_registry(cfg, Arc::clone(&registry));
    let app = router::build_router(state.clone());
    let server = Server::bind("127.0.0.1:0".parse().unwrap(), app, state.cfg())
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    (server, addr, registry)
}

/// Send request headers only; the handler is then in flight waiting for the body.
async fn open_track(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "POST /track HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
        BODY.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn in_flight_request_finishes_during_drain() {
    let (server, addr, registry) = start(Duration::from_secs(5)).await;
    let mut phase = server.phase();
    assert_eq!(*phase.borrow(), Phase::Starting);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(server.run(async move {
        let _ = stop_rx.await;
    }));
    phase.wait_for(|p| *p == Phase::Serving).await.unwrap();

    let mut stream = open_track(addr).await;
    sleep(Duration::from_millis(100)).await;

    stop_tx.send(()).unwrap();
    phase.wait_for(|p| *p == Phase::Draining).await.unwrap();
    sleep(Duration::from_millis(100)).await;

    // no longer accepting
    assert!(TcpStream::connect(addr).await.is_err());

    stream.write_all(BODY.as_bytes()).await.unwrap();
    let mut resp = String::new();
    timeout(Duration::from_secs(5), stream.read_to_string(&mut resp))
        .await
        .expect("response before close")
        .unwrap();
    assert!(resp.starts_with("HTTP/1.1 202"), "{resp}");

    let outcome = timeout(Duration::from_secs(5), run).await.unwrap().unwrap();
    assert_eq!(outcome, DrainOutcome::Completed);
    assert_eq!(*phase.borrow(), Phase::Stopped);
    assert_eq!(
        registry.get(&LabelKey::new("alice", "eng", "/v1/chat").unwrap()),
        Some(1)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drain_is_bounded_by_grace() {
    let (server, addr, registry) = start(Duration::from_millis(200)).await;
    let mut phase = server.phase();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(server.run(async move {
        let _ = stop_rx.await;
    }));
    phase.wait_for(|p| *p == Phase::Serving).await.unwrap();

    // body never arrives
    let _stream = open_track(addr).await;
    sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();

    let outcome = timeout(Duration::from_secs(3), run).await.unwrap().unwrap();
    assert_eq!(outcome, DrainOutcome::Forced);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn shutdown_after_served_traffic_completes() {
    let (server, addr, _) = start(Duration::from_secs(5)).await;
    let phase = server.phase();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(server.run(async move {
        let _ = stop_rx.await;
    }));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut resp = String::new();
    timeout(Duration::from_secs(5), stream.read_to_string(&mut resp))
        .await
        .unwrap()
        .unwrap();
    assert!(resp.starts_with("HTTP/1.1 204"), "{resp}");

    stop_tx.send(()).unwrap();
    let outcome = timeout(Duration::from_secs(5), run).await.unwrap().unwrap();
    assert_eq!(outcome, DrainOutcome::Completed);
    assert_eq!(*phase.borrow(), Phase::Stopped);
}

#[tokio::test]
async fn stalled_headers_are_cut_off() {
    let (server, addr, registry) = start_with(UsageConfig {
        header_read_timeout: Duration::from_millis(300),
        ..UsageConfig::default()
    })
    .await;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(server.run(async move {
        let _ = stop_rx.await;
    }));

    // no blank line: the head never completes
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"POST /track HTTP/1.1\r\nHost: test\r\n")
        .await
        .unwrap();

    let mut buf = Vec::new();
    let closed = timeout(Duration::from_secs(3), stream.read_to_end(&mut buf)).await;
    assert!(closed.is_ok(), "connection still open after header timeout");

    stop_tx.send(()).unwrap();
    let outcome = timeout(Duration::from_secs(5), run).await.unwrap().unwrap();
    assert_eq!(outcome, DrainOutcome::Completed);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn bind_conflict_is_a_startup_error() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let state = AppState::new(UsageConfig::default());
    let app = router::build_router(state.clone());
    let err = Server::bind(addr, app, state.cfg())
        .await
        .err()
        .expect("port already bound");
    assert!(matches!(err, UsageError::Bind { .. }));
}
