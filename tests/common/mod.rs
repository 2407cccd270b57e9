//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use tokio::net::TcpListener;

use storyteller_runtime::config::RuntimeConfig;
use storyteller_runtime::lifecycle::{LifecycleEvent, LifecycleObserver};

/// Start a mock storage endpoint that accepts and holds connections open,
/// the way a database session would.
#[allow(dead_code)]
pub async fn start_storage_endpoint(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        let _session = socket;
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock storage endpoint only after `delay` has passed; connection
/// attempts before that are refused.
#[allow(dead_code)]
pub fn start_storage_endpoint_after(addr: SocketAddr, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        start_storage_endpoint(addr).await;
    });
}

/// Observer that records every lifecycle event for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LifecycleEvent>>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: fn(&LifecycleEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub fn position(&self, pred: fn(&LifecycleEvent) -> bool) -> Option<usize> {
        self.events().iter().position(pred)
    }
}

impl LifecycleObserver for RecordingObserver {
    fn notify(&self, event: &LifecycleEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Config wired for tests: short timeouts, addresses on the given ports.
#[allow(dead_code)]
pub fn test_config(listener_port: u16, storage_port: u16) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.listener.bind_address = format!("127.0.0.1:{listener_port}");
    config.storage.address = format!("127.0.0.1:{storage_port}");
    config.storage.connect_timeout_secs = 1;
    config.storage.max_retries = 3;
    config.storage.retry_delay_ms = 200;
    config.shutdown.grace_timeout_secs = 5;
    config
}
