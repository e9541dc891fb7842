//! Log output for the chat server.
//!
//! Events from this crate and from the HTTP trace layer (`tower_http`) are
//! shown at the configured level; every other crate is held at `warn`. The
//! per-request spans of the trace layer are emitted at `debug`, so they only
//! appear when the level is `debug` or `trace`. A non-empty `RUST_LOG`
//! replaces these directives entirely.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::{Level, Subscriber};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{LearnSyncError, Result};

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Filter directives for a configured level.
fn filter_directives(level: &str) -> String {
    let level = parse_level(level);
    let others = if level == Level::ERROR { "error" } else { "warn" };
    let level = level.as_str().to_ascii_lowercase();
    format!("{others},learnsync={level},tower_http={level}")
}

/// Build the filter, preferring `rust_log` when it is set.
fn build_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(filter_directives(level)),
    }
}

/// Open the log file for appending, creating missing parent directories.
///
/// An empty path means console only.
fn open_log_file(path: &str) -> Result<Option<File>> {
    if path.is_empty() {
        return Ok(None);
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Some(file))
}

/// Console output, plus a plain-text copy in `log_file` when given.
fn build_subscriber(
    filter: EnvFilter,
    log_file: Option<File>,
) -> impl Subscriber + Send + Sync + 'static {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);
    let file = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
}

fn install(subscriber: impl Subscriber + Send + Sync + 'static) -> Result<()> {
    subscriber
        .try_init()
        .map_err(|e| LearnSyncError::Config(format!("logging already initialized: {e}")))
}

/// Initialize logging from the `[logging]` section.
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let log_file = open_log_file(&config.file)?;
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(&config.level, rust_log.as_deref());
    install(build_subscriber(filter, log_file))
}

/// Initialize console-only logging.
///
/// Used when the log file is unusable; does nothing if logging is already up.
pub fn init_console_only(level: &str) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(level, rust_log.as_deref());
    let _ = install(build_subscriber(filter, None));
}
