//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (retries >= 1, timeouts > 0)
//! - Check addresses parse before the runtime tries to use them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RuntimeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RuntimeConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RuntimeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a valid socket address: {:?}", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new(
            "listener.max_connections",
            "must be at least 1",
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be at least 1",
        ));
    }

    if config.storage.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "storage.address",
            format!("not a valid socket address: {:?}", config.storage.address),
        ));
    }
    if config.storage.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "storage.connect_timeout_secs",
            "must be at least 1",
        ));
    }
    if config.storage.max_retries == 0 {
        errors.push(ValidationError::new(
            "storage.max_retries",
            "must be at least 1",
        ));
    }

    if config.shutdown.grace_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "shutdown.grace_timeout_secs",
            "must be at least 1",
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "unknown level {:?}, expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = RuntimeConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.storage.max_retries = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"storage.max_retries"));
        assert!(fields.contains(&"observability.log_level"));
    }

    #[test]
    fn zero_grace_timeout_rejected() {
        let mut config = RuntimeConfig::default();
        config.shutdown.grace_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "shutdown.grace_timeout_secs");
    }
}
