// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; with the `file-logging` feature, an additional
//! file sink in a timestamped run folder.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Build the filter for `debug_flags` on top of `default_level`.
/// `RUST_LOG`, when set, replaces both.
pub fn build_filter(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<EnvFilter> {
    if let Ok(directives) = std::env::var("RUST_LOG") {
        return EnvFilter::try_new(&directives).map_err(|e| anyhow!("Invalid RUST_LOG '{}': {}", directives, e));
    }
    let filter = debug_flags.to_filter_string(default_level);
    EnvFilter::try_new(&filter).map_err(|e| anyhow!("Invalid log filter '{}': {}", filter, e))
}

/// Initialize console logging
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<()> {
    let filter = build_filter(debug_flags, default_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug_flags.any_enabled())
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

#[cfg(feature = "file-logging")]
pub use file::{init_file_logging, LoggingGuard};

#[cfg(feature = "file-logging")]
mod file {
    use std::path::{Path, PathBuf};

    use anyhow::{anyhow, Context, Result};
    use chrono::Utc;
    use tracing_appender::rolling;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{Layer, Registry};

    use super::build_filter;
    use crate::cli::CrateDebugFlags;

    /// Keeps the non-blocking file writer alive. Logs are flushed on drop.
    pub struct LoggingGuard {
        _file_guard: tracing_appender::non_blocking::WorkerGuard,
        log_dir: PathBuf,
    }

    impl LoggingGuard {
        /// Run folder holding this process's log file
        pub fn log_dir(&self) -> &Path {
            &self.log_dir
        }
    }

    /// Initialize console and file logging
    ///
    /// Creates `<log_dir>/run_<timestamp>/spikenet.log`.
    pub fn init_file_logging(
        debug_flags: &CrateDebugFlags,
        default_level: &str,
        log_dir: Option<PathBuf>,
    ) -> Result<LoggingGuard> {
        let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let run_folder = base_log_dir.join(format!("run_{}", timestamp));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(debug_flags.any_enabled())
            .with_filter(build_filter(debug_flags, default_level)?);

        let (writer, guard) = tracing_appender::non_blocking(rolling::never(&run_folder, "spikenet.log"));
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_filter(build_filter(debug_flags, default_level)?);

        Registry::default()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

        Ok(LoggingGuard {
            _file_guard: guard,
            log_dir: run_folder,
        })
    }
}
