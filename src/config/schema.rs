//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the runtime.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the service runtime.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// Storage dependency settings (address, startup retry policy).
    pub storage: StorageConfig,

    /// Shutdown settings (drain deadline).
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
            request_timeout_secs: 30,
        }
    }
}

/// Storage dependency configuration.
///
/// The runtime never serves traffic until this dependency is reachable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage endpoint address (e.g., "127.0.0.1:27017").
    pub address: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Maximum number of connection attempts before giving up.
    pub max_retries: u32,

    /// Fixed delay between connection attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:27017".to_string(),
            connect_timeout_secs: 5,
            max_retries: 5,
            retry_delay_ms: 5000,
        }
    }
}

impl StorageConfig {
    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Inter-attempt delay as a `Duration`.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Hard deadline for the whole shutdown sequence in seconds.
    /// If the drain has not finished by then, the process exits non-zero.
    pub grace_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_timeout_secs: 10,
        }
    }
}

impl ShutdownConfig {
    /// Grace deadline as a `Duration`.
    pub fn grace_timeout(&self) -> Duration {
        Duration::from_secs(self.grace_timeout_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
