//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RuntimeConfig (validated, immutable)
//!     → shared by value with the subsystems that need it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the runtime reads it exactly once at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, RuntimeConfig, ShutdownConfig, StorageConfig};
pub use validation::{validate_config, ValidationError};
