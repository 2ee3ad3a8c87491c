// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0
//! Serialization of configuration files.

use spikenet_config::{BackendKind, SpikenetConfig};

#[test]
fn test_full_config_parses() {
    let toml_text = r#"
        [backend]
        kind = "multi_threaded"
        thread_count = 8
        population_part_size = 256
        projection_part_size = 512

        [plasticity]
        enabled = false

        [simulation]
        steps = 2000
        slow_step_warn_ms = 0

        [logging]
        level = "debug"
        log_dir = "./logs"
        file_logging = true
    "#;
    let config: SpikenetConfig = toml::from_str(toml_text).unwrap();
    assert_eq!(config.backend.kind, BackendKind::MultiThreaded);
    assert_eq!(config.backend.population_part_size, 256);
    assert!(!config.plasticity.enabled);
    assert_eq!(config.simulation.steps, 2000);
    assert_eq!(config.logging.log_dir.as_deref(), Some(std::path::Path::new("./logs")));
}

#[test]
fn test_config_survives_json_and_toml() {
    let mut config = SpikenetConfig::default();
    config.backend.kind = BackendKind::MultiThreaded;
    config.simulation.steps = 42;

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"multi_threaded\""));
    let from_json: SpikenetConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, config);

    let toml_text = toml::to_string(&config).unwrap();
    let from_toml: SpikenetConfig = toml::from_str(&toml_text).unwrap();
    assert_eq!(from_toml, config);
}

#[test]
fn test_backend_kind_parses_aliases() {
    assert_eq!("MT".parse::<BackendKind>().unwrap(), BackendKind::MultiThreaded);
    assert_eq!("single-threaded".parse::<BackendKind>().unwrap(), BackendKind::SingleThreaded);
    assert!("gpu".parse::<BackendKind>().is_err());
    assert_eq!(BackendKind::MultiThreaded.to_string(), "multi_threaded");
}
