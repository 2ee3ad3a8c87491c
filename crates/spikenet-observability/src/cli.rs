// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-spikenet-npu-burst-engine` to raise one
//! crate to debug level, and `--debug-all` for every known crate.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates whose logs are raised to debug level
///
/// # Example
/// ```rust
/// use spikenet_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-spikenet-npu-messaging".to_string()]);
/// assert!(flags.is_enabled("spikenet-npu-messaging"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`. Other arguments
    /// are ignored.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }
        flags
    }

    pub fn enable_all(&mut self) {
        self.enabled_crates
            .extend(KNOWN_CRATES.iter().map(|name| name.to_string()));
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `DEBUG` for flagged crates, `INFO` otherwise
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create a tracing filter directive from debug flags
    ///
    /// Crate names are converted to their module path form, since tracing
    /// targets use underscores. Example: `"warn,spikenet_npu_messaging=debug"`.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut filters = vec![default_level.to_lowercase()];
        filters.extend(
            self.enabled_crates
                .iter()
                .map(|name| format!("{}=debug", name.replace('-', "_"))),
        );
        filters.join(",")
    }
}

/// Parse debug flags from process arguments and `SPIKENET_DEBUG`
///
/// The environment variable takes a comma-separated list of crate names, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("SPIKENET_DEBUG") {
        if env_var == "all" {
            flags.enable_all();
        } else {
            flags.enabled_crates.extend(
                env_var
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  SPIKENET_DEBUG=all             Enable all crates
  SPIKENET_DEBUG=crate1,crate2   Enable specific crates (comma-separated)"#,
        KNOWN_CRATES.join("\n  ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(args(&["simulate", "--steps", "10", "--debug-spikenet-npu-network"]));
        assert!(flags.is_enabled("spikenet-npu-network"));
        assert!(!flags.is_enabled("spikenet-config"));
        assert_eq!(flags.log_level("spikenet-npu-network"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("spikenet-config"), tracing::Level::INFO);
    }

    #[test]
    fn test_debug_all_enables_known_crates() {
        let flags = CrateDebugFlags::from_args(args(&["--debug-all"]));
        for name in KNOWN_CRATES {
            assert!(flags.is_enabled(name));
        }
    }

    #[test]
    fn test_filter_string_uses_module_paths() {
        let flags = CrateDebugFlags::from_args(args(&["--debug-spikenet-npu-burst-engine"]));
        assert_eq!(flags.to_filter_string("WARN"), "warn,spikenet_npu_burst_engine=debug");
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }
}
