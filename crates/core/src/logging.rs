//! Structured logging infrastructure for civicdispatch.
//!
//! Centralised `tracing` subscriber setup. `RUST_LOG` always wins; the
//! configured level is only the fallback when it is unset.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize human-readable logging at `info` unless `RUST_LOG` says otherwise.
///
/// # Example
/// ```no_run
/// use civicdispatch_core::logging;
///
/// logging::init();
/// tracing::info!("Dispatch console started");
/// ```
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize JSON logging for log aggregation.
///
/// # Example
/// ```no_run
/// use civicdispatch_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "dispatch-node", "Service started");
/// ```
pub fn init_json() {
    init_with(&LoggingConfig {
        json: true,
        ..LoggingConfig::default()
    });
}

/// Initialize logging from the `[logging]` config section.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with(config: &LoggingConfig) {
    let filter = filter_or(&config.level);

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("logging already initialised");
    }
}
