// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0
//! End-to-end runs of a synfire chain through the public umbrella API.

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use spikenet::prelude::*;
use tempfile::tempdir;

fn options(steps: u64) -> RunOptions {
    RunOptions {
        steps,
        stimulus_period: 10,
        slow_step_warn: Duration::from_secs(60),
    }
}

fn comparable(mut summary: SimulationSummary) -> SimulationSummary {
    summary.backend.clear();
    summary.elapsed_ms = 0.0;
    summary
}

#[test]
fn test_volley_travels_one_layer_per_step() {
    let chain = build_synfire_chain(&SynfireParams::default()).unwrap();
    let mut backend = SingleThreadedBackend::new();
    let summary = run_synfire(&mut backend, chain, &options(60)).unwrap();

    for layer in 0..4u64 {
        let activity = &summary.activity[&format!("layer-{}", layer)];
        assert_eq!(activity.first_spike_step, Some(1 + layer));
        // One full volley per stimulus, six stimuli in 60 steps
        assert_eq!(activity.spikes, 6 * 16);
    }
    assert_eq!(summary.steps, 60);
}

#[test]
fn test_layer_delay_spaces_volleys() {
    let chain = build_synfire_chain(&SynfireParams {
        layers: 3,
        layer_delay: 3,
        ..SynfireParams::default()
    })
    .unwrap();
    let mut backend = SingleThreadedBackend::new();
    let summary = run_synfire(&mut backend, chain, &options(12)).unwrap();

    assert_eq!(summary.activity["layer-0"].first_spike_step, Some(1));
    assert_eq!(summary.activity["layer-1"].first_spike_step, Some(4));
    assert_eq!(summary.activity["layer-2"].first_spike_step, Some(7));
}

#[test]
fn test_backends_produce_identical_summaries() {
    let params = SynfireParams {
        layer_size: 24,
        readout_d_u: 0.2,
        ..SynfireParams::default()
    };

    let mut single = SingleThreadedBackend::new();
    let single_summary = run_synfire(&mut single, build_synfire_chain(&params).unwrap(), &options(80)).unwrap();

    let mut multi = MultiThreadedBackend::with_part_sizes(4, 5, 37).unwrap();
    let multi_summary = run_synfire(&mut multi, build_synfire_chain(&params).unwrap(), &options(80)).unwrap();

    assert_eq!(comparable(single_summary), comparable(multi_summary));
}

#[test]
fn test_learning_disabled_keeps_readout_weights() {
    let params = SynfireParams::default();
    let mut config = SpikenetConfig::default();
    config.plasticity.enabled = false;

    let mut frozen = create_backend(&config).unwrap();
    let summary = run_synfire(frozen.as_mut(), build_synfire_chain(&params).unwrap(), &options(40)).unwrap();
    assert!(!summary.learning);
    assert_eq!(summary.readout_weight_mean, Some(params.readout_weight));

    config.plasticity.enabled = true;
    let mut learning = create_backend(&config).unwrap();
    let summary = run_synfire(learning.as_mut(), build_synfire_chain(&params).unwrap(), &options(40)).unwrap();
    assert!(summary.readout_weight_mean.unwrap() > params.readout_weight);
}

#[test]
fn test_config_file_selects_backend() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spikenet_configuration.toml");
    fs::write(
        &path,
        r#"
[backend]
kind = "multi_threaded"
thread_count = 2
population_part_size = 8
projection_part_size = 64

[simulation]
steps = 25
"#,
    )
    .unwrap();

    let mut overrides = HashMap::new();
    overrides.insert("learning".to_string(), "false".to_string());
    let config = load_config(Some(&path), Some(&overrides)).unwrap();
    assert_eq!(config.backend.kind, BackendKind::MultiThreaded);
    assert_eq!(config.simulation.steps, 25);

    let mut backend = create_backend(&config).unwrap();
    assert_eq!(backend.backend_name(), "multi-threaded");
    assert!(!backend.is_learning());

    let summary = run_synfire(
        backend.as_mut(),
        build_synfire_chain(&SynfireParams::default()).unwrap(),
        &options(config.simulation.steps),
    )
    .unwrap();
    assert_eq!(summary.activity["layer-3"].first_spike_step, Some(4));
}
