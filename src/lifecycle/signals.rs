//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for the two termination signals (SIGTERM, SIGINT)
//! - Translate signals into a trigger on the shutdown coordinator
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Repeated signals while stopping are logged and ignored; the sequence
//!   runs exactly once and the drain deadline is never extended
//! - The coordinator is the only coupling to the manager, keeping the
//!   manager testable without real signals

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;

/// Listen for termination signals and trigger the shutdown coordinator.
///
/// Runs until the process exits; spawn it alongside the manager.
#[cfg(unix)]
pub async fn listen(shutdown: Arc<Shutdown>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register SIGINT handler");
            return;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register SIGTERM handler");
            return;
        }
    };

    loop {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };

        if shutdown.trigger() {
            tracing::info!(signal = name, "Termination signal received");
        } else {
            tracing::info!(signal = name, "Already stopping, signal ignored");
        }
    }
}

/// Fallback for non-Unix targets: Ctrl+C only.
#[cfg(not(unix))]
pub async fn listen(shutdown: Arc<Shutdown>) {
    loop {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to register Ctrl+C handler");
            return;
        }
        if shutdown.trigger() {
            tracing::info!(signal = "ctrl_c", "Termination signal received");
        } else {
            tracing::info!(signal = "ctrl_c", "Already stopping, signal ignored");
        }
    }
}
