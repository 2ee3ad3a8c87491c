// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikenet Plasticity
//!
//! Synaptic-resource STDP. Each plastic synapse converts an unbounded
//! resource into a bounded weight; learning moves resource between synapses
//! and their postsynaptic neuron's free pool:
//!
//! - [`on_presynaptic_spike`]: unconditional, Hebbian and drain terms,
//!   evaluated when the synapse transmits a spike
//! - [`apply_dopamine`]: reinforcement of recently active synapses
//! - [`renormalize_population`]: redistribution of a neuron's free resource
//!   over its incoming synapses
//!
//! Postsynaptic stability and ISI tracking live on
//! [`SynapticResourceNeuron`](spikenet_npu_neural::SynapticResourceNeuron)
//! and run during population dynamics.
//!
//! All functions operate on disjoint synapse ranges. Debits against a
//! neuron's free resource are returned to the caller and applied after the
//! parallel phase has joined.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod renormalization;
pub mod resource_stdp;

pub use renormalization::{apply_resource_debits, renormalize_population};
pub use resource_stdp::{apply_dopamine, on_presynaptic_spike, ResourceDebit};
