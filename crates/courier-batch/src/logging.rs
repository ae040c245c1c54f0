//! # Logging
//!
//! Installs the global `tracing` subscriber for a run.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  registry                                                          │
//! │  ├── console layer ──► stderr      filter: RUST_LOG or [logging]   │
//! │  │                                 level (default "info")          │
//! │  └── file layer ─────► logs/app.log  filter: "debug", no ANSI      │
//! │                        (append; only when logging.file is set)     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results are written to stdout only when the output path is `-`, so
//! logs never mix with them.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{BatchError, BatchResult};

/// Level the log file always records at.
pub const FILE_LOG_LEVEL: &str = "debug";

/// Initialises tracing from the logging settings.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show per-row decisions on the console
/// - `RUST_LOG=courier_core=trace` - Trace for the engine only
/// - Default: the configured `logging.level`
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_tracing(settings: &LoggingSettings) -> BatchResult<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| BatchError::Logging(format!("bad level '{}': {}", settings.level, e)))?;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file = match settings.file_path() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| BatchError::file(parent, e))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| BatchError::file(path, e))?;

            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(FILE_LOG_LEVEL)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| BatchError::Logging(e.to_string()))
}
