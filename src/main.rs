//! Service entry point: load config, wire collaborators, run the lifecycle.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use storyteller_runtime::config::{load_config, RuntimeConfig};
use storyteller_runtime::lifecycle::{signals, LifecycleManager, Shutdown, TracingObserver};
use storyteller_runtime::observability::{init_logging, install_panic_hook};
use storyteller_runtime::storage::TcpConnector;

#[derive(Parser)]
#[command(name = "storyteller-runtime")]
#[command(about = "Service runtime for The Story Teller platform", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    init_logging(&config.observability);
    install_panic_hook();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "storyteller-runtime starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage_address = %config.storage.address,
        max_retries = config.storage.max_retries,
        retry_delay_ms = config.storage.retry_delay_ms,
        grace_timeout_secs = config.shutdown.grace_timeout_secs,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen(shutdown.clone()));

    let manager = LifecycleManager::new(
        config,
        Arc::new(TcpConnector),
        Arc::new(TracingObserver::new()),
        shutdown,
    );

    let outcome = manager.run().await;
    tracing::info!(outcome = %outcome, exit_code = outcome.exit_code(), "Runtime finished");

    // exit() rather than returning: after a forced shutdown there may still
    // be connection tasks alive, and the process must not outlive the
    // deadline waiting for them
    std::process::exit(outcome.exit_code());
}
