//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle manager → events.rs (structured events)
//!     → TracingObserver → logging.rs (subscriber: level filter, format)
//!     → stdout (pretty for development, JSON for production)
//! ```
//!
//! # Design Decisions
//! - The manager never formats log output; it reports events and the
//!   subscriber configured here decides presentation
//! - RUST_LOG overrides the configured level when set
//! - Panics are reported through the same pipeline (report-only; they do
//!   not start a shutdown)

pub mod logging;

pub use logging::{init_logging, install_panic_hook};
