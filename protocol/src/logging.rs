//! # Structured Logging
//!
//! The library emits `tracing` events (debug-level on assembly, trace-level
//! on hash derivation, warn on rejected signer sets) and never installs a
//! subscriber on its own. Applications that want those events on stderr can
//! call [`init_logging`] once at startup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    /// Parses "json" or "pretty" (case-insensitive). Anything else is `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `default_level` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"ledger_signing=debug"`. Output goes to stderr.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes. Safe to call from every test.
pub fn init_logging(default_level: &str, format: LogFormat) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!("logging initialized (format={:?})", format);
    }
    installed
}

/// Environment variable selecting the output format for
/// [`init_logging_from_env`].
pub const LOG_FORMAT_ENV: &str = "LEDGER_SIGNING_LOG_FORMAT";

/// [`init_logging`] with the format read from [`LOG_FORMAT_ENV`]. Unset or
/// unrecognized values fall back to `Pretty`.
pub fn init_logging_from_env(default_level: &str) -> bool {
    let format = std::env::var(LOG_FORMAT_ENV)
        .map(|value| LogFormat::from_str_lossy(&value))
        .unwrap_or(LogFormat::Pretty);
    init_logging(default_level, format)
}
