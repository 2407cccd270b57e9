//! Configuration loading from disk.

use std::path::Path;

use crate::config::schema::RuntimeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: RuntimeConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config_with_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [storage]
            address = "127.0.0.1:9042"
            max_retries = 3
            retry_delay_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.address, "127.0.0.1:9042");
        assert_eq!(config.storage.max_retries, 3);
        assert_eq!(config.storage.retry_delay_ms, 100);
        // untouched sections keep their defaults
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.shutdown.grace_timeout_secs, 10);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/runtime.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
