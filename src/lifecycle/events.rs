//! Lifecycle event reporting.
//!
//! The manager describes what happened (event kind, attempt numbers, elapsed
//! times, error text); the observer owns formatting and persistence. The
//! production observer forwards to `tracing`; tests install a recording
//! observer to assert on event order.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

/// A single lifecycle transition or milestone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A storage connection attempt is starting.
    ConnectAttempt { attempt: u32, max_retries: u32 },
    /// A storage connection attempt failed. `retry_in` is `None` on the
    /// final attempt.
    ConnectFailed {
        attempt: u32,
        max_retries: u32,
        error: String,
        retry_in: Option<Duration>,
    },
    /// The storage dependency is connected.
    Connected { attempt: u32, elapsed: Duration },
    /// All retries exhausted; the process will exit non-zero.
    StartupFailed { attempts: u32, elapsed: Duration },
    /// A termination signal aborted startup before the runtime became ready.
    StartupAborted { attempt: u32 },
    /// The network listener is open and accepting connections.
    ListenerOpened { addr: SocketAddr },
    /// The listener could not be opened; fatal.
    ListenerFailed { error: String },
    /// Shutdown sequence has begun.
    ShutdownStarted,
    /// The listener stopped accepting new connections.
    ListenerClosed { active_connections: u64 },
    /// All in-flight work finished within the grace period.
    DrainCompleted { elapsed: Duration },
    /// The grace deadline expired with work still in flight.
    DrainTimedOut {
        grace: Duration,
        active_connections: u64,
    },
    /// The storage connection has been released.
    StorageReleased,
}

/// Sink for lifecycle events.
///
/// Implementations must not block; the manager calls this inline.
pub trait LifecycleObserver: Send + Sync {
    fn notify(&self, event: &LifecycleEvent);
}

/// Production observer: forwards every event to `tracing`, stamped with the
/// per-run instance id.
pub struct TracingObserver {
    instance_id: Uuid,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
        }
    }

    /// Identifier stamped on every event emitted by this run.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleObserver for TracingObserver {
    fn notify(&self, event: &LifecycleEvent) {
        let instance = self.instance_id;
        match event {
            LifecycleEvent::ConnectAttempt { attempt, max_retries } => {
                tracing::info!(instance_id = %instance, attempt, max_retries, "Connecting to storage");
            }
            LifecycleEvent::ConnectFailed {
                attempt,
                max_retries,
                error,
                retry_in,
            } => {
                tracing::warn!(
                    instance_id = %instance,
                    attempt,
                    max_retries,
                    error = %error,
                    retry_in = ?retry_in,
                    "Storage connection attempt failed"
                );
            }
            LifecycleEvent::Connected { attempt, elapsed } => {
                tracing::info!(instance_id = %instance, attempt, elapsed = ?elapsed, "Storage connected");
            }
            LifecycleEvent::StartupFailed { attempts, elapsed } => {
                tracing::error!(
                    instance_id = %instance,
                    attempts,
                    elapsed = ?elapsed,
                    "Storage unreachable, giving up"
                );
            }
            LifecycleEvent::StartupAborted { attempt } => {
                tracing::info!(instance_id = %instance, attempt, "Startup aborted by termination signal");
            }
            LifecycleEvent::ListenerOpened { addr } => {
                tracing::info!(instance_id = %instance, address = %addr, "Listening for connections");
            }
            LifecycleEvent::ListenerFailed { error } => {
                tracing::error!(instance_id = %instance, error = %error, "Failed to open listener");
            }
            LifecycleEvent::ShutdownStarted => {
                tracing::info!(instance_id = %instance, "Shutdown signal received");
            }
            LifecycleEvent::ListenerClosed { active_connections } => {
                tracing::info!(
                    instance_id = %instance,
                    active_connections,
                    "Stopped accepting connections"
                );
            }
            LifecycleEvent::DrainCompleted { elapsed } => {
                tracing::info!(instance_id = %instance, elapsed = ?elapsed, "In-flight requests drained");
            }
            LifecycleEvent::DrainTimedOut {
                grace,
                active_connections,
            } => {
                tracing::warn!(
                    instance_id = %instance,
                    grace = ?grace,
                    active_connections,
                    "Drain deadline expired, forcing shutdown"
                );
            }
            LifecycleEvent::StorageReleased => {
                tracing::info!(instance_id = %instance, "Storage connection released");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = LifecycleEvent::ConnectAttempt {
            attempt: 1,
            max_retries: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "connect_attempt");
        assert_eq!(json["attempt"], 1);
        assert_eq!(json["max_retries"], 3);
    }

    #[test]
    fn tracing_observer_has_stable_instance_id() {
        let observer = TracingObserver::new();
        assert_eq!(observer.instance_id(), observer.instance_id());
    }
}
