//! Tracing subscriber setup for the host process
//!
//! Log level comes from the `LOG_LEVEL` environment variable
//! (`trace|debug|warn|error`, anything else means `info`). Component
//! namespacing is carried by tracing targets/module paths, so there is no
//! per-name logger registry to grow.

use anyhow::Result;
use tracing::Level as TraceLevel;
use tracing_subscriber::FmtSubscriber;

/// Parse a log level string the way the daemon always has
pub fn parse_level(raw: &str) -> TraceLevel {
    match raw.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

/// Install the global subscriber. Call once, before boot.
pub fn init() -> Result<()> {
    let log_level = parse_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
