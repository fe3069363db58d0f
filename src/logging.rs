//! Structured logging setup for programs built on the synthesis engine.
//!
//! The library only emits `tracing` events. Front ends call [`init_logging`]
//! once; `RUST_LOG` overrides the configured level when set.

use std::fmt;

use tracing_subscriber::{fmt as tfmt, prelude::*, EnvFilter};

/// Log level configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every intermediate value, including root iterations.
    Trace,
    /// g-values, poles and polynomials.
    Debug,
    /// One line per finished design.
    Info,
    /// Ambiguous root choices only.
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Log output format.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
}

/// Logging configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    /// Minimum level when no filter or `RUST_LOG` is given.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Directive string (e.g. `lc_ladder::filters=debug`), takes precedence over `level`.
    pub filter: Option<String>,
    /// Include file and line of each event.
    pub source_location: bool,
}

impl LogConfig {
    /// Progress messages for each design, as a `-v` flag would enable.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Info,
            ..Self::default()
        }
    }

    /// Every intermediate quantity, with source locations.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            source_location: true,
            ..Self::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match &self.filter {
            Some(custom) => EnvFilter::try_new(custom).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// Returns `false` when a subscriber was already installed; the existing one is kept.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = config.env_filter();
    let result = match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(
                tfmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location),
            ),
        ),
        LogFormat::Compact => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(
                tfmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location),
            ),
        ),
    };
    result.is_ok()
}
