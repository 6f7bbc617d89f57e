// src/logging.rs

//! Logging setup for `dist-executor` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `BK_DIST_EXECUTOR_LOG_LEVEL` token carried in
//! [`ExecutorConfig`](crate::config::ExecutorConfig). Anything unrecognised
//! means silent: the executor stands in for a real build tool, and its own
//! diagnostics must not leak into output that other tools parse.
//!
//! Logs are sent to STDERR so that stdout carries only tool output.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

/// Verbosity of the executor's own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    #[default]
    Silent,
}

impl LogLevel {
    /// Parse the environment token; unrecognised or empty tokens are silent.
    pub fn from_token(token: Option<&str>) -> Self {
        token
            .and_then(|t| t.parse().ok())
            .unwrap_or(LogLevel::Silent)
    }

    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "nothing" | "silent" => Ok(LogLevel::Silent),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

/// Initialise the global logging subscriber.
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_logging(level: LogLevel) {
    // Only debug shows targets and thread ids.
    let verbose = level == LogLevel::Debug;

    let _ = fmt()
        .with_max_level(level.as_filter())
        .with_target(verbose)
        .with_thread_ids(verbose)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
