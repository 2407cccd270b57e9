//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (bounded listener)
//!     → server.rs (per-connection serve task, HTTP/1.1 + HTTP/2)
//!     → middleware (request ID, timeout, trace)
//!     → health.rs (liveness / readiness probes)
//! ```
//!
//! The probe routes are the only HTTP surface the runtime owns; the
//! platform's resource APIs mount on top of it in their own services.

pub mod health;
pub mod server;

pub use server::{AppState, Draining, HttpServer};
