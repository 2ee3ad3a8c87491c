// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use spikenet_npu_neural::{Synapse, SynapseModel, Uid};

/// Synapses of a single model from one source to one population.
///
/// `presynaptic_uid` is `None` for projections driven by external input
/// channels instead of a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection<S> {
    uid: Uid,
    presynaptic_uid: Option<Uid>,
    postsynaptic_uid: Uid,
    synapses: Vec<Synapse<S>>,
}

impl<S: SynapseModel> Projection<S> {
    pub fn new(presynaptic_uid: Option<Uid>, postsynaptic_uid: Uid, synapses: Vec<Synapse<S>>) -> Self {
        Self::with_uid(Uid::new(), presynaptic_uid, postsynaptic_uid, synapses)
    }

    pub fn with_uid(
        uid: Uid,
        presynaptic_uid: Option<Uid>,
        postsynaptic_uid: Uid,
        synapses: Vec<Synapse<S>>,
    ) -> Self {
        Self {
            uid,
            presynaptic_uid,
            postsynaptic_uid,
            synapses,
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn presynaptic_uid(&self) -> Option<Uid> {
        self.presynaptic_uid
    }

    pub fn postsynaptic_uid(&self) -> Uid {
        self.postsynaptic_uid
    }

    pub fn len(&self) -> usize {
        self.synapses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synapses.is_empty()
    }

    pub fn synapses(&self) -> &[Synapse<S>] {
        &self.synapses
    }

    /// Mutable access to synapse state. The slice cannot be resized.
    pub fn synapses_mut(&mut self) -> &mut [Synapse<S>] {
        &mut self.synapses
    }

    /// Indexes of the synapses leaving presynaptic neuron `source`
    pub fn synapses_from(&self, source: u32) -> impl Iterator<Item = usize> + '_ {
        self.synapses
            .iter()
            .enumerate()
            .filter(move |(_, synapse)| synapse.source == source)
            .map(|(index, _)| index)
    }
}
