//! HTTP server setup and the accept/serve loop.
//!
//! # Responsibilities
//! - Create the Axum Router with the probe handlers
//! - Wire up middleware (request ID, timeout, trace)
//! - Serve connections from the bounded listener (HTTP/1.1 and HTTP/2)
//! - Stop accepting the instant shutdown triggers, then hand the manager a
//!   [`Draining`] so the in-flight drain can be bounded by the grace deadline
//!
//! # Design Decisions
//! - The accept loop owns the listener; dropping it on shutdown closes the
//!   accept socket immediately while spawned connections keep running
//! - Connection errors after readiness are reported and swallowed; they are
//!   never grounds for the runtime to terminate itself

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::sync::{broadcast, watch};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ListenerConfig;
use crate::http::health;
use crate::lifecycle::LifecycleState;
use crate::net::{ConnectionTracker, Listener};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle state watch; readiness derives from it.
    pub lifecycle: watch::Receiver<LifecycleState>,
    /// Active-connection tracker shared with the serve loop.
    pub tracker: ConnectionTracker,
}

/// HTTP server for the runtime's probe surface.
pub struct HttpServer {
    router: Router,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// `app_routes` are the hosting service's own endpoints; they share the
    /// middleware stack and drain together with the probes.
    pub fn new(
        config: &ListenerConfig,
        lifecycle: watch::Receiver<LifecycleState>,
        tracker: ConnectionTracker,
        app_routes: Option<Router>,
    ) -> Self {
        let state = AppState {
            lifecycle,
            tracker: tracker.clone(),
        };

        let mut router = Router::new()
            .route("/health", get(health::liveness))
            .route("/ready", get(health::readiness))
            .with_state(state);

        if let Some(routes) = app_routes {
            router = router.merge(routes);
        }

        let router = router
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http());

        Self { router, tracker }
    }

    /// Accept and serve connections until the shutdown signal fires.
    ///
    /// Returns once accepting has stopped; the listener is consumed and its
    /// socket closed. In-flight connections continue on their own tasks and
    /// are collected through the returned [`Draining`].
    pub async fn serve(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) -> Draining {
        let builder = auto::Builder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        let service = TowerToHyperService::new(self.router);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr, permit)) => {
                            let io = TokioIo::new(stream);
                            let conn = builder.serve_connection_with_upgrades(io, service.clone());
                            let conn = graceful.watch(conn.into_owned());
                            let guard = self.tracker.track();
                            tokio::spawn(async move {
                                if let Err(e) = conn.await {
                                    tracing::debug!(
                                        peer_addr = %peer_addr,
                                        connection_id = %guard.id(),
                                        error = %e,
                                        "Connection ended with error"
                                    );
                                }
                                drop(guard);
                                drop(permit);
                            });
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Accept failed");
                        }
                    }
                }
            }
        }

        // Listener drops here: the accept socket closes and no new work is admitted.
        Draining { graceful }
    }
}

/// Handle to the in-flight connections left over after accepting stopped.
pub struct Draining {
    graceful: GracefulShutdown,
}

impl Draining {
    /// Resolve once every in-flight connection has completed.
    ///
    /// The caller bounds this with the grace deadline; `Draining` itself
    /// never times out.
    pub async fn wait(self) {
        self.graceful.shutdown().await;
    }
}
