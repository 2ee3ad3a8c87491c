// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse models
//!
//! A synapse is a `(source, target)` pair of neuron indexes plus model
//! parameters. Index semantics are relative to the projection's presynaptic
//! source and postsynaptic population.

pub mod delta;
pub mod resource;

pub use delta::DeltaSynapse;
pub use resource::{
    resource_from_weight, weight_from_resource, ResourceStdpDeltaSynapse, SynapticResourceRule,
    MAX_WEIGHT_FRACTION,
};

use serde::{Deserialize, Serialize};

use crate::types::OutputType;

/// Parameters every synapse model exposes to the propagation engine
pub trait SynapseModel: Clone + Send + Sync + 'static {
    const MODEL_NAME: &'static str;

    fn weight(&self) -> f32;

    /// Delivery delay in steps. A delay of 0 behaves as 1.
    fn delay(&self) -> u32;

    fn output_type(&self) -> OutputType;
}

/// One synapse of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synapse<P> {
    pub params: P,
    pub source: u32,
    pub target: u32,
}

impl<P> Synapse<P> {
    pub fn new(params: P, source: u32, target: u32) -> Self {
        Self {
            params,
            source,
            target,
        }
    }
}
