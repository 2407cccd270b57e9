//! Runtime lifecycle state machine.
//!
//! # States
//! ```text
//! Starting → Connecting → Ready → Stopping → Stopped
//!     │           │
//!     └───────────┴────────→ Failed
//! ```
//!
//! Starting and Connecting may also move straight to Stopped when a
//! termination signal arrives before the runtime ever becomes ready.
//!
//! # Design Decisions
//! - Single writer (the manager); readers observe via a watch channel
//! - Illegal transitions are ignored and logged, never panicked on
//! - Readiness probes derive directly from this state

use serde::Serialize;
use tokio::sync::watch;

/// Lifecycle state of the runtime process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Process is initializing, storage not yet attempted.
    Starting,
    /// Storage connection attempts in progress.
    Connecting,
    /// Storage connected, listener open, serving traffic.
    Ready,
    /// Shutdown in progress: accept stopped, in-flight draining.
    Stopping,
    /// All resources released.
    Stopped,
    /// Startup failed; the process must exit non-zero.
    Failed,
}

impl LifecycleState {
    /// Stable lowercase name, used in probe responses and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Connecting => "connecting",
            LifecycleState::Ready => "ready",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Failed => "failed",
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Failed)
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn transition_allowed(from: LifecycleState, to: LifecycleState) -> bool {
    use LifecycleState::*;
    matches!(
        (from, to),
        (Starting, Connecting)
            | (Starting, Failed)
            | (Starting, Stopped)
            | (Connecting, Ready)
            | (Connecting, Failed)
            | (Connecting, Stopped)
            | (Ready, Stopping)
            | (Stopping, Stopped)
    )
}

/// Shared state cell with watch-channel observers.
///
/// The manager is the only writer; the HTTP readiness handler and tests
/// subscribe through [`StateCell::watch`].
#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<LifecycleState>,
}

impl StateCell {
    /// Create a cell in the `Starting` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Starting);
        Self { tx }
    }

    /// Current state.
    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `to` if the transition is legal. Returns whether it happened.
    pub fn transition(&self, to: LifecycleState) -> bool {
        let from = self.current();
        if !transition_allowed(from, to) {
            tracing::warn!(%from, %to, "Ignoring illegal lifecycle transition");
            return false;
        }
        tracing::debug!(%from, %to, "Lifecycle state changed");
        self.tx.send_replace(to);
        true
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
