//! Startup integration tests: retry bound, recovery, and the
//! no-serving-before-ready guarantee.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;

use storyteller_runtime::lifecycle::{
    LifecycleEvent, LifecycleManager, LifecycleState, Shutdown,
};
use storyteller_runtime::storage::TcpConnector;
use storyteller_runtime::RunOutcome;

mod common;

#[tokio::test]
async fn test_retry_exhaustion_exits_nonzero() {
    let listener_addr: std::net::SocketAddr = "127.0.0.1:29181".parse().unwrap();
    // nothing ever listens on the storage port
    let mut config = common::test_config(29181, 29182);
    config.storage.max_retries = 2;
    config.storage.retry_delay_ms = 50;

    let observer = Arc::new(common::RecordingObserver::default());
    let manager = LifecycleManager::new(
        config,
        Arc::new(TcpConnector),
        observer.clone(),
        Arc::new(Shutdown::new()),
    );
    let state = manager.state();

    let outcome = manager.run().await;

    assert_eq!(outcome, RunOutcome::StartupFailed);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(*state.borrow(), LifecycleState::Failed);
    assert_eq!(
        observer.count(|e| matches!(e, LifecycleEvent::ConnectAttempt { .. })),
        2
    );
    // no partial service was ever exposed
    assert_eq!(
        observer.position(|e| matches!(e, LifecycleEvent::ListenerOpened { .. })),
        None
    );
    assert!(TcpStream::connect(listener_addr).await.is_err());
}

#[tokio::test]
async fn test_no_premature_serving_until_storage_recovers() {
    let listener_addr: std::net::SocketAddr = "127.0.0.1:29281".parse().unwrap();
    let storage_addr = "127.0.0.1:29282".parse().unwrap();

    // storage comes up only after two failed attempts
    common::start_storage_endpoint_after(storage_addr, Duration::from_millis(500));

    let mut config = common::test_config(29281, 29282);
    config.storage.max_retries = 5;
    config.storage.retry_delay_ms = 200;

    let observer = Arc::new(common::RecordingObserver::default());
    let shutdown = Arc::new(Shutdown::new());
    let manager = LifecycleManager::new(
        config,
        Arc::new(TcpConnector),
        observer.clone(),
        shutdown.clone(),
    );
    let mut state = manager.state();

    let handle = tokio::spawn(manager.run());

    // mid-retry: the accept socket must not exist yet
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(*state.borrow(), LifecycleState::Connecting);
    assert!(
        TcpStream::connect(listener_addr).await.is_err(),
        "listener must stay closed while the dependency is down"
    );

    while *state.borrow() != LifecycleState::Ready {
        state.changed().await.unwrap();
    }
    assert!(
        observer.count(|e| matches!(e, LifecycleEvent::ConnectAttempt { .. })) >= 2,
        "recovery should have taken more than one attempt"
    );
    assert!(TcpStream::connect(listener_addr).await.is_ok());

    shutdown.trigger();
    assert_eq!(handle.await.unwrap(), RunOutcome::CleanShutdown);
}

#[tokio::test]
async fn test_probe_endpoints_once_ready() {
    let storage_addr = "127.0.0.1:29382".parse().unwrap();
    common::start_storage_endpoint(storage_addr).await;

    let config = common::test_config(29381, 29382);
    let observer = Arc::new(common::RecordingObserver::default());
    let shutdown = Arc::new(Shutdown::new());
    let manager = LifecycleManager::new(
        config,
        Arc::new(TcpConnector),
        observer.clone(),
        shutdown.clone(),
    );
    let mut state = manager.state();

    let handle = tokio::spawn(manager.run());
    while *state.borrow() != LifecycleState::Ready {
        state.changed().await.unwrap();
    }

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get("http://127.0.0.1:29381/health")
        .send()
        .await
        .expect("runtime unreachable");
    assert_eq!(res.status(), 200);

    let res = client
        .get("http://127.0.0.1:29381/ready")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["state"], "ready");

    shutdown.trigger();
    assert_eq!(handle.await.unwrap(), RunOutcome::CleanShutdown);
}
