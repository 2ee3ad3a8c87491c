// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikenet - discrete-time spiking neural network simulation kernel
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`neural`]: ids, errors, BLIFAT and synaptic-resource neuron models,
//!   delta and resource-STDP synapses
//! - [`messaging`]: message bus, endpoints, subscriptions
//! - [`network`]: populations, projections, network container, generators
//! - [`plasticity`]: synaptic-resource STDP rule and renormalization
//! - [`burst_engine`]: step pipeline, thread pool, backends
//! - [`config`]: TOML configuration with environment/CLI overrides
//! - [`observability`]: logging initialization and per-crate debug flags
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spikenet::prelude::*;
//!
//! let mut network = Network::new();
//! let a = network.add_population(Population::from_fn(10, |_| BlifatNeuron::default()));
//! let b = network.add_population(Population::from_fn(10, |_| BlifatNeuron::default()));
//! network.add_projection(one_to_one(Some(a), b, 10, |_| DeltaSynapse::excitatory(1.5, 2)));
//!
//! let mut backend = create_backend(&SpikenetConfig::default())?;
//! backend.load_network(network)?;
//! for _ in 0..10 {
//!     backend.step()?;
//! }
//! # Ok::<(), SpikenetError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use spikenet_config as config;
pub use spikenet_npu_burst_engine as burst_engine;
pub use spikenet_npu_messaging as messaging;
pub use spikenet_npu_network as network;
pub use spikenet_npu_neural as neural;
pub use spikenet_npu_plasticity as plasticity;
pub use spikenet_observability as observability;

pub mod simulation;
pub mod synfire;

pub mod prelude {
    pub use spikenet_config::{load_config, BackendKind, SpikenetConfig};
    pub use spikenet_npu_burst_engine::{
        create_backend, Backend, MultiThreadedBackend, NetworkData, SingleThreadedBackend,
    };
    pub use spikenet_npu_messaging::{
        Endpoint, MessageBus, MessageHeader, SpikeMessage, SynapticImpact, SynapticImpactMessage,
    };
    pub use spikenet_npu_network::generators::{all_to_all, from_arrays, from_pairs, one_to_one};
    pub use spikenet_npu_network::{Network, Population, PopulationVariant, Projection, ProjectionVariant};
    pub use spikenet_npu_neural::{
        BlifatNeuron, DeltaSynapse, OutputType, ResourceStdpDeltaSynapse, Result, SpikenetError, Step,
        Synapse, SynapticResourceNeuron, Uid,
    };

    pub use crate::simulation::{run_synfire, RunOptions, SimulationSummary};
    pub use crate::synfire::{build_synfire_chain, SynfireChain, SynfireParams};
}
