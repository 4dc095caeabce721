//! Structured logging setup
//!
//! Provides JSON-formatted and human-readable logging with optional file
//! output. Log output goes to stderr so command output on stdout stays
//! machine-readable.

use crate::config::LoggingConfig;
use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter directive for `config`
///
/// `RUST_LOG` still takes precedence when set.
pub fn filter_directive(config: &LoggingConfig) -> String {
    format!("railtrail={}", config.level.to_lowercase())
}

/// Initialize the global tracing subscriber from configuration
///
/// # Examples
///
/// ```no_run
/// use railtrail::config::LoggingConfig;
/// use railtrail::logging::init_logging;
///
/// let config = LoggingConfig {
///     level: "debug".to_string(),
///     json: true,
///     file_path: None,
/// };
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(config)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        let stderr_layer = fmt::layer().json().with_writer(std::io::stderr);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            let file_layer = fmt::layer().json().with_writer(Arc::new(file));

            registry.with(stderr_layer).with(file_layer).try_init()?;
        } else {
            registry.with(stderr_layer).try_init()?;
        }
    } else {
        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));

            registry.with(stderr_layer).with(file_layer).try_init()?;
        } else {
            registry.with(stderr_layer).try_init()?;
        }
    }

    Ok(())
}
