//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialize the tracing subscriber.
///
/// The level comes from `RUST_LOG` when set, otherwise from the config.
/// Call once at startup, before the first log line.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "storyteller_runtime={},tower_http={}",
            config.log_level, config.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Report panics through the logging pipeline.
///
/// A panic on a connection task is surfaced here and nowhere else; it does
/// not trigger the shutdown sequence.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Unhandled fault");
        previous(info);
    }));
}
