//! Liveness and readiness probes.
//!
//! # Responsibilities
//! - `/health`: process is up and able to answer (liveness)
//! - `/ready`: runtime has its storage dependency and is serving (readiness)
//!
//! # Design Decisions
//! - Readiness derives from the lifecycle state watch, never from a probe
//!   of its own; the manager is the single source of truth
//! - Responses carry the state name and active connection count so
//!   operators can see drain progress during shutdown

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::http::server::AppState;
use crate::lifecycle::LifecycleState;

/// GET /health — liveness probe.
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /ready — readiness probe.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let lifecycle = *state.lifecycle.borrow();
    let body = json!({
        "state": lifecycle,
        "active_connections": state.tracker.active_count(),
    });

    let status = if lifecycle == LifecycleState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body))
}
