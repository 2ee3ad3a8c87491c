// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation driver.
//!
//! Loads the configuration, builds a synfire chain with a plastic readout,
//! runs it on the configured backend and logs per-population spike counts.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use spikenet::config::load_config;
use spikenet::observability::{debug_flags_help, init_logging, CrateDebugFlags};
use spikenet::prelude::*;
use tracing::info;

struct Args {
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
    layers: usize,
    layer_size: usize,
    stimulus_period: u64,
    json: bool,
    debug_args: Vec<String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: simulate [--config <path>] [--steps <n>] [--backend <single_threaded|multi_threaded>]\n\
         \x20               [--threads <n>] [--no-learning] [--layers <n>] [--layer-size <n>]\n\
         \x20               [--stimulus-period <n>] [--json] [--debug-<crate> ...]\n\n\
         Defaults:\n\
         - config: SPIKENET_CONFIG_PATH or ./spikenet_configuration.toml, built-in defaults if absent\n\
         - layers: 4, layer-size: 16, stimulus-period: 10\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config_path: None,
        overrides: HashMap::new(),
        layers: 4,
        layer_size: 16,
        stimulus_period: 10,
        json: false,
        debug_args: Vec::new(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().unwrap_or_else(|| usage_and_exit());
        match arg.as_str() {
            "--config" => parsed.config_path = Some(PathBuf::from(value())),
            "--steps" => {
                parsed.overrides.insert("steps".to_string(), value());
            }
            "--backend" => {
                parsed.overrides.insert("backend".to_string(), value());
            }
            "--threads" => {
                parsed.overrides.insert("thread_count".to_string(), value());
            }
            "--no-learning" => {
                parsed.overrides.insert("learning".to_string(), "false".to_string());
            }
            "--layers" => parsed.layers = value().parse().unwrap_or_else(|_| usage_and_exit()),
            "--layer-size" => parsed.layer_size = value().parse().unwrap_or_else(|_| usage_and_exit()),
            "--stimulus-period" => {
                parsed.stimulus_period = value().parse().unwrap_or_else(|_| usage_and_exit())
            }
            "--json" => parsed.json = true,
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => parsed.debug_args.push(other.to_string()),
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    parsed
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = load_config(args.config_path.as_deref(), Some(&args.overrides))
        .context("Failed to load configuration")?;

    let debug_flags = CrateDebugFlags::from_args(args.debug_args.iter().cloned());
    #[cfg(feature = "file-logging")]
    let _logging_guard = if config.logging.file_logging {
        Some(spikenet::observability::init_file_logging(
            &debug_flags,
            &config.logging.level,
            config.logging.log_dir.clone(),
        )?)
    } else {
        init_logging(&debug_flags, &config.logging.level)?;
        None
    };
    #[cfg(not(feature = "file-logging"))]
    init_logging(&debug_flags, &config.logging.level)?;

    info!("[SIMULATE] spikenet v{}", spikenet::VERSION);

    let chain = build_synfire_chain(&SynfireParams {
        layers: args.layers,
        layer_size: args.layer_size,
        ..SynfireParams::default()
    })?;
    let mut backend = create_backend(&config)?;
    let options = RunOptions {
        steps: config.simulation.steps,
        stimulus_period: args.stimulus_period,
        slow_step_warn: Duration::from_millis(config.simulation.slow_step_warn_ms),
    };
    let summary = run_synfire(backend.as_mut(), chain, &options)?;

    for (label, activity) in &summary.activity {
        info!(
            "[SIMULATE] {:<10} {:>6} spike(s), first at {:?}",
            label, activity.spikes, activity.first_spike_step
        );
    }
    if let Some(mean) = summary.readout_weight_mean {
        info!("[SIMULATE] Mean readout weight: {:.4}", mean);
    }
    info!(
        "[SIMULATE] {} step(s) in {:.1}ms ({} slow)",
        summary.steps, summary.elapsed_ms, summary.slow_steps
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
