// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use spikenet_npu_neural::{NeuronModel, Uid};

/// Neurons of a single model. The length never changes after construction,
/// so neuron indexes stay valid for the lifetime of the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population<N> {
    uid: Uid,
    neurons: Vec<N>,
}

impl<N: NeuronModel> Population<N> {
    pub fn new(neurons: Vec<N>) -> Self {
        Self::with_uid(Uid::new(), neurons)
    }

    pub fn with_uid(uid: Uid, neurons: Vec<N>) -> Self {
        Self { uid, neurons }
    }

    /// Build `count` neurons from a per-index generator
    pub fn from_fn(count: usize, generator: impl FnMut(usize) -> N) -> Self {
        Self::new((0..count).map(generator).collect())
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[N] {
        &self.neurons
    }

    /// Mutable access to neuron state. The slice cannot be resized.
    pub fn neurons_mut(&mut self) -> &mut [N] {
        &mut self.neurons
    }

    pub fn get(&self, index: usize) -> Option<&N> {
        self.neurons.get(index)
    }
}
