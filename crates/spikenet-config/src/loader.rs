// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, SpikenetConfig};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "spikenet_configuration.toml";

/// Find the spikenet configuration file
///
/// Search order:
/// 1. `SPIKENET_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKENET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKENET_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SPIKENET_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load, override and validate the configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for
///   and defaults are used when none exists.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns an error if an explicit file is missing, contains invalid TOML, or the
/// result fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikenetConfig> {
    let config_file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => match find_config_file() {
            Ok(path) => Some(path),
            Err(ConfigError::FileNotFound(_)) if env::var("SPIKENET_CONFIG_PATH").is_err() => None,
            Err(e) => return Err(e),
        },
    };

    let mut config = match config_file {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            toml::from_str::<SpikenetConfig>(&content)?
        }
        None => SpikenetConfig::default(),
    };

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKENET_BACKEND` -> `backend.kind`
/// - `SPIKENET_THREAD_COUNT` -> `backend.thread_count`
/// - `SPIKENET_POPULATION_PART_SIZE` -> `backend.population_part_size`
/// - `SPIKENET_PROJECTION_PART_SIZE` -> `backend.projection_part_size`
/// - `SPIKENET_LEARNING` -> `plasticity.enabled`
/// - `SPIKENET_STEPS` -> `simulation.steps`
/// - `SPIKENET_LOG_LEVEL` -> `logging.level`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut SpikenetConfig) {
    if let Ok(value) = env::var("SPIKENET_BACKEND") {
        if let Ok(kind) = value.parse() {
            config.backend.kind = kind;
        }
    }
    if let Ok(value) = env::var("SPIKENET_THREAD_COUNT") {
        if let Ok(count) = value.parse::<usize>() {
            config.backend.thread_count = count;
        }
    }
    if let Ok(value) = env::var("SPIKENET_POPULATION_PART_SIZE") {
        if let Ok(size) = value.parse::<usize>() {
            config.backend.population_part_size = size;
        }
    }
    if let Ok(value) = env::var("SPIKENET_PROJECTION_PART_SIZE") {
        if let Ok(size) = value.parse::<usize>() {
            config.backend.projection_part_size = size;
        }
    }
    if let Ok(value) = env::var("SPIKENET_LEARNING") {
        config.plasticity.enabled = parse_bool(&value);
    }
    if let Ok(value) = env::var("SPIKENET_STEPS") {
        if let Ok(steps) = value.parse::<u64>() {
            config.simulation.steps = steps;
        }
    }
    if let Ok(value) = env::var("SPIKENET_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"backend": "multi_threaded", "steps": "500"}`)
///
/// # Errors
///
/// Unlike environment overrides, an unparsable CLI value is an error.
pub fn apply_cli_overrides(
    config: &mut SpikenetConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("backend") {
        config.backend.kind = value.parse()?;
    }
    if let Some(value) = cli_args.get("thread_count") {
        config.backend.thread_count = parse_number(value, "thread_count")?;
    }
    if let Some(value) = cli_args.get("population_part_size") {
        config.backend.population_part_size = parse_number(value, "population_part_size")?;
    }
    if let Some(value) = cli_args.get("projection_part_size") {
        config.backend.projection_part_size = parse_number(value, "projection_part_size")?;
    }
    if let Some(value) = cli_args.get("learning") {
        config.plasticity.enabled = parse_bool(value);
    }
    if let Some(value) = cli_args.get("steps") {
        config.simulation.steps = parse_number(value, "steps")?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &str) -> ConfigResult<T> {
    value
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(format!("{} must be a number, got '{}'", field, value)))
}
