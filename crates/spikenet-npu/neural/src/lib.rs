// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikenet Neural Computation
//!
//! Everything a single neuron or a single synapse needs, independent of how
//! the network is scheduled:
//! - **Types**: identifiers, step counter, output types, error taxonomy
//! - **Models**: BLIFAT and synaptic-resource BLIFAT neurons
//! - **Synapse**: delta synapses and the synaptic-resource STDP parameters,
//!   including the resource/weight conversion math

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod models;
pub mod synapse;
pub mod types;

pub use models::{BlifatNeuron, NeuronModel, SynapticResourceNeuron};
pub use synapse::{
    resource_from_weight, weight_from_resource, DeltaSynapse, ResourceStdpDeltaSynapse, Synapse,
    SynapseModel, SynapticResourceRule,
};
pub use types::{OutputType, Result, SpikenetError, Step, Uid};
