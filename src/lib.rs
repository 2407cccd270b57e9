//! The Story Teller service runtime
//!
//! Bootstrap and graceful-lifecycle layer shared by the platform's services:
//! it brings a process from cold start to ready-to-serve, and from a
//! termination signal to fully released resources.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────┐
//!                  │                 SERVICE RUNTIME                     │
//!                  │                                                     │
//!   Storage        │  ┌──────────┐   connect × R, delay D  ┌─────────┐  │
//!   endpoint ◀─────┼──│ storage  │◀────────────────────────│lifecycle│  │
//!                  │  │connector │                         │ manager │  │
//!                  │  └──────────┘                         └────┬────┘  │
//!                  │                                            │ ready │
//!   Client         │  ┌──────────┐    ┌──────────┐              ▼       │
//!   traffic ──────▶┼─▶│   net    │───▶│   http   │   starting → ready   │
//!                  │  │ listener │    │  server  │   → stopping → stopped│
//!                  │  └──────────┘    └──────────┘                      │
//!                  │                                                     │
//!                  │  ┌────────────────────────────────────────────────┐│
//!                  │  │            Cross-Cutting Concerns               ││
//!                  │  │  ┌────────┐ ┌──────────────┐ ┌───────────────┐ ││
//!                  │  │  │ config │ │ signals +    │ │ observability │ ││
//!                  │  │  │        │ │ shutdown     │ │ (events, logs)│ ││
//!                  │  │  └────────┘ └──────────────┘ └───────────────┘ ││
//!                  │  └────────────────────────────────────────────────┘│
//!                  └────────────────────────────────────────────────────┘
//! ```
//!
//! The listener never opens before the storage dependency is connected, and
//! the storage handle is never released before the listener has stopped
//! accepting work. Shutdown is bounded by a hard grace deadline; if the
//! drain overruns it the process exits non-zero instead of hanging.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod storage;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RuntimeConfig;
pub use lifecycle::{LifecycleManager, LifecycleState, RunOutcome, Shutdown};
