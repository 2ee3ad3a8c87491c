// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `spikenet_configuration.toml`. Every
//! field has a default, so a partial file is valid.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikenetConfig {
    pub backend: BackendConfig,
    pub plasticity: PlasticityConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

/// Which backend executes the step pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    SingleThreaded,
    MultiThreaded,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "single_threaded" | "st" => Ok(BackendKind::SingleThreaded),
            "multi_threaded" | "mt" => Ok(BackendKind::MultiThreaded),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown backend kind '{}' (expected single_threaded or multi_threaded)",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::SingleThreaded => write!(f, "single_threaded"),
            BackendKind::MultiThreaded => write!(f, "multi_threaded"),
        }
    }
}

/// Backend selection and partitioning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Worker threads for the multi-threaded backend (0 = available parallelism)
    pub thread_count: usize,
    /// Neurons per task in the population phase
    pub population_part_size: usize,
    /// Synapses per task in the projection phase
    pub projection_part_size: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::SingleThreaded,
            thread_count: 0,
            population_part_size: 1000,
            projection_part_size: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlasticityConfig {
    /// Start backends with learning enabled
    pub enabled: bool,
}

impl Default for PlasticityConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for the simulation driver
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub steps: u64,
    /// Steps slower than this are logged as warnings (0 disables)
    pub slow_step_warn_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            slow_step_warn_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for file logs when file logging is compiled in
    pub log_dir: Option<PathBuf>,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_logging: false,
        }
    }
}
