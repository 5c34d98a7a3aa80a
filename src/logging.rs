//! Diagnostic logging via `tracing` and `tracing-subscriber`.
//!
//! Program output (post lists, views) goes to stdout through
//! [`crate::output`]. Diagnostics go to stderr through this subscriber so the
//! two never interleave in a pipe.
//!
//! # Log Levels
//!
//! - `error`: unrecoverable CLI failures
//! - `warn`: failed loads, rejected config
//! - `info`: load summaries (post and category counts)
//! - `debug`: route resolution, query recomputation, dispatched events
//! - `trace`: everything else
//!
//! `RUST_LOG` takes precedence over the verbosity flag when set.

use tracing::Level;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::default(),
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count to a level.
    ///
    /// - 0: warn
    /// - 1 (`-v`): info
    /// - 2 (`-vv`): debug
    /// - 3+ (`-vvv`): trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Filter from `RUST_LOG`, falling back to `level` for this crate only.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = format!("{}={}", env!("CARGO_CRATE_NAME"), level.as_str().to_lowercase());
        EnvFilter::new(directive)
    })
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = build_env_filter(config.level);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.with_ansi)
                    .with_target(config.with_target)
                    .without_time(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.with_ansi)
                    .with_target(config.with_target)
                    .without_time(),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        assert_eq!(LogConfig::default().level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(3).level, Level::TRACE);
        assert_eq!(LogConfig::from_verbosity(9).level, Level::TRACE);
    }

    #[test]
    fn builders_override_fields() {
        let config = LogConfig::from_verbosity(1)
            .with_format(LogFormat::Compact)
            .with_ansi(false);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.with_ansi);
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn filter_targets_this_crate() {
        // Only meaningful when RUST_LOG is unset in the test environment.
        if std::env::var_os("RUST_LOG").is_none() {
            let filter = build_env_filter(Level::DEBUG);
            assert_eq!(filter.to_string(), "post_index=debug");
        }
    }
}
