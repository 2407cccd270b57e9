//! Lifecycle orchestration.
//!
//! # Responsibilities
//! - Bring the process from cold start to ready-to-serve: storage connection
//!   (bounded retries, fixed delay) first, listener last
//! - Run the shutdown sequence: stop accepting, drain in-flight work,
//!   release the storage handle, all under one hard deadline
//! - Report every attempt and phase transition to the observer
//!
//! # Design Decisions
//! - Fail fast: the runtime never serves without its storage dependency
//! - The manager owns the storage handle and the listener exclusively;
//!   all closure goes through the shutdown sequence
//! - A termination signal during the retry loop aborts startup cleanly
//!   instead of proceeding to ready

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, watch};

use crate::config::RuntimeConfig;
use crate::http::HttpServer;
use crate::lifecycle::events::{LifecycleEvent, LifecycleObserver};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::state::{LifecycleState, StateCell};
use crate::net::{ConnectionTracker, Listener};
use crate::storage::{StorageConnection, StorageConnector};

/// How a completed run ended. `main` maps this to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Ready, served, drained and released everything in time.
    CleanShutdown,
    /// A termination signal arrived before the runtime became ready.
    StartupAborted,
    /// The storage dependency stayed unreachable through every retry.
    StartupFailed,
    /// The drain deadline expired with work still in flight.
    ForcedShutdown,
}

impl RunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::CleanShutdown | RunOutcome::StartupAborted => 0,
            RunOutcome::StartupFailed => 1,
            RunOutcome::ForcedShutdown => 2,
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunOutcome::CleanShutdown => "clean_shutdown",
            RunOutcome::StartupAborted => "startup_aborted",
            RunOutcome::StartupFailed => "startup_failed",
            RunOutcome::ForcedShutdown => "forced_shutdown",
        };
        f.write_str(name)
    }
}

enum ConnectOutcome {
    Connected(Box<dyn StorageConnection>),
    Aborted,
    Exhausted,
}

/// Owns process startup, dependency-connection retry, and coordinated
/// shutdown of the listener and the storage handle.
pub struct LifecycleManager {
    config: RuntimeConfig,
    connector: Arc<dyn StorageConnector>,
    observer: Arc<dyn LifecycleObserver>,
    shutdown: Arc<Shutdown>,
    state: StateCell,
    app_routes: Option<axum::Router>,
}

impl LifecycleManager {
    /// Create a manager with its collaborators injected.
    pub fn new(
        config: RuntimeConfig,
        connector: Arc<dyn StorageConnector>,
        observer: Arc<dyn LifecycleObserver>,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        Self {
            config,
            connector,
            observer,
            shutdown,
            state: StateCell::new(),
            app_routes: None,
        }
    }

    /// Mount the service's own routes next to the probe endpoints.
    ///
    /// The routes share the runtime's middleware and drain with it during
    /// shutdown; this is how the platform's resource APIs ride on the
    /// lifecycle without owning any of it.
    pub fn with_app_routes(mut self, routes: axum::Router) -> Self {
        self.app_routes = Some(routes);
        self
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.state.watch()
    }

    /// Drive the process through its whole life: connect, serve, shut down.
    ///
    /// Never returns early with an error; every failure mode is folded into
    /// the returned [`RunOutcome`] because there is no caller to propagate
    /// to — `main` only maps the outcome to an exit code.
    pub async fn run(self) -> RunOutcome {
        let mut shutdown_rx = self.shutdown.subscribe();

        self.state.transition(LifecycleState::Connecting);

        let storage = match self.connect_with_retry(&mut shutdown_rx).await {
            ConnectOutcome::Connected(conn) => conn,
            ConnectOutcome::Aborted => {
                self.state.transition(LifecycleState::Stopped);
                return RunOutcome::StartupAborted;
            }
            ConnectOutcome::Exhausted => {
                self.state.transition(LifecycleState::Failed);
                return RunOutcome::StartupFailed;
            }
        };

        // Storage is up; only now may the listener open.
        let listener = match Listener::bind(&self.config.listener).await {
            Ok(listener) => listener,
            Err(e) => {
                self.observer.notify(&LifecycleEvent::ListenerFailed {
                    error: e.to_string(),
                });
                storage.close().await;
                self.state.transition(LifecycleState::Failed);
                return RunOutcome::StartupFailed;
            }
        };
        let addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                self.observer.notify(&LifecycleEvent::ListenerFailed {
                    error: e.to_string(),
                });
                storage.close().await;
                self.state.transition(LifecycleState::Failed);
                return RunOutcome::StartupFailed;
            }
        };
        self.observer
            .notify(&LifecycleEvent::ListenerOpened { addr });

        let tracker = ConnectionTracker::new();
        let server = HttpServer::new(
            &self.config.listener,
            self.state.watch(),
            tracker.clone(),
            self.app_routes.clone(),
        );
        self.state.transition(LifecycleState::Ready);

        // Serves until the shutdown signal fires; accepting stops the moment
        // it returns.
        let draining = server.serve(listener, shutdown_rx).await;

        self.observer.notify(&LifecycleEvent::ShutdownStarted);
        self.state.transition(LifecycleState::Stopping);

        // One deadline bounds the rest of the sequence. A second signal
        // cannot reach this code again, so it can neither restart the
        // sequence nor extend the deadline.
        let grace = self.config.shutdown.grace_timeout();
        let deadline = tokio::time::Instant::now() + grace;

        self.observer.notify(&LifecycleEvent::ListenerClosed {
            active_connections: tracker.active_count(),
        });

        let drain_started = Instant::now();
        let forced = tokio::select! {
            _ = draining.wait() => {
                self.observer.notify(&LifecycleEvent::DrainCompleted {
                    elapsed: drain_started.elapsed(),
                });
                false
            }
            _ = tokio::time::sleep_until(deadline) => {
                self.observer.notify(&LifecycleEvent::DrainTimedOut {
                    grace,
                    active_connections: tracker.active_count(),
                });
                true
            }
        };

        storage.close().await;
        self.observer.notify(&LifecycleEvent::StorageReleased);
        self.state.transition(LifecycleState::Stopped);

        if forced {
            RunOutcome::ForcedShutdown
        } else {
            RunOutcome::CleanShutdown
        }
    }

    /// The startup retry loop: up to `max_retries` attempts, a fixed delay
    /// apart, each attempt bounded by the connect timeout. A shutdown
    /// trigger aborts between and during attempts.
    async fn connect_with_retry(
        &self,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> ConnectOutcome {
        let addr: SocketAddr = match self.config.storage.address.parse() {
            Ok(addr) => addr,
            Err(_) => {
                // config validation rejects unparseable addresses before the
                // manager is ever constructed
                self.observer.notify(&LifecycleEvent::StartupFailed {
                    attempts: 0,
                    elapsed: Duration::ZERO,
                });
                return ConnectOutcome::Exhausted;
            }
        };

        let max_retries = self.config.storage.max_retries;
        let delay = self.config.storage.retry_delay();
        let connect_timeout = self.config.storage.connect_timeout();
        let started = Instant::now();

        if self.shutdown.is_triggered() {
            self.observer
                .notify(&LifecycleEvent::StartupAborted { attempt: 0 });
            return ConnectOutcome::Aborted;
        }

        for attempt in 1..=max_retries {
            self.observer.notify(&LifecycleEvent::ConnectAttempt {
                attempt,
                max_retries,
            });

            let result = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    self.observer.notify(&LifecycleEvent::StartupAborted { attempt });
                    return ConnectOutcome::Aborted;
                }
                result = self.connector.connect(addr, connect_timeout) => result,
            };

            match result {
                Ok(conn) => {
                    self.observer.notify(&LifecycleEvent::Connected {
                        attempt,
                        elapsed: started.elapsed(),
                    });
                    return ConnectOutcome::Connected(conn);
                }
                Err(e) => {
                    let retry_in = (attempt < max_retries).then_some(delay);
                    self.observer.notify(&LifecycleEvent::ConnectFailed {
                        attempt,
                        max_retries,
                        error: e.to_string(),
                        retry_in,
                    });
                    if attempt < max_retries {
                        tokio::select! {
                            biased;
                            _ = shutdown_rx.recv() => {
                                self.observer.notify(&LifecycleEvent::StartupAborted { attempt });
                                return ConnectOutcome::Aborted;
                            }
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            }
        }

        self.observer.notify(&LifecycleEvent::StartupFailed {
            attempts: max_retries,
            elapsed: started.elapsed(),
        });
        ConnectOutcome::Exhausted
    }
}
