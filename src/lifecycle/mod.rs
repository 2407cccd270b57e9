//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (manager.rs):
//!     Connect to storage (bounded retries, fixed delay) → Bind listener → Serve
//!
//! Shutdown (manager.rs + shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight → Release storage → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger the shutdown coordinator
//! ```
//!
//! # Design Decisions
//! - Ordered startup: storage connection first, listener last (traffic only when ready)
//! - Ordered shutdown: stop accept, drain, release storage
//! - Shutdown has a hard deadline: forced non-zero exit after it expires
//! - The coordinator is injected, never an ambient global, so the whole
//!   sequence is testable in-process

pub mod events;
pub mod manager;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use events::{LifecycleEvent, LifecycleObserver, TracingObserver};
pub use manager::{LifecycleManager, RunOutcome};
pub use shutdown::Shutdown;
pub use state::LifecycleState;
