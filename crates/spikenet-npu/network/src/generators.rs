// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Helpers that build populations and projections from closures or arrays.

use spikenet_npu_neural::{NeuronModel, Result, SpikenetError, Synapse, SynapseModel, Uid};

use crate::population::Population;
use crate::projection::Projection;

/// Population of `count` neurons, `generator(index)` builds each one
pub fn make_population<N: NeuronModel>(count: usize, generator: impl FnMut(usize) -> N) -> Population<N> {
    Population::from_fn(count, generator)
}

/// Connect every presynaptic neuron to every postsynaptic neuron.
///
/// Synapses are ordered by source, then by target.
pub fn all_to_all<S: SynapseModel>(
    presynaptic_uid: Option<Uid>,
    postsynaptic_uid: Uid,
    presynaptic_size: usize,
    postsynaptic_size: usize,
    mut generator: impl FnMut(u32, u32) -> S,
) -> Projection<S> {
    let mut synapses = Vec::with_capacity(presynaptic_size * postsynaptic_size);
    for source in 0..presynaptic_size as u32 {
        for target in 0..postsynaptic_size as u32 {
            synapses.push(Synapse::new(generator(source, target), source, target));
        }
    }
    Projection::new(presynaptic_uid, postsynaptic_uid, synapses)
}

/// Connect neuron `i` to neuron `i` for `i in 0..size`
pub fn one_to_one<S: SynapseModel>(
    presynaptic_uid: Option<Uid>,
    postsynaptic_uid: Uid,
    size: usize,
    mut generator: impl FnMut(u32) -> S,
) -> Projection<S> {
    let synapses = (0..size as u32)
        .map(|index| Synapse::new(generator(index), index, index))
        .collect();
    Projection::new(presynaptic_uid, postsynaptic_uid, synapses)
}

/// One synapse per `(source, target)` pair, in pair order
pub fn from_pairs<S: SynapseModel>(
    presynaptic_uid: Option<Uid>,
    postsynaptic_uid: Uid,
    pairs: &[(u32, u32)],
    mut generator: impl FnMut(u32, u32) -> S,
) -> Projection<S> {
    let synapses = pairs
        .iter()
        .map(|&(source, target)| Synapse::new(generator(source, target), source, target))
        .collect();
    Projection::new(presynaptic_uid, postsynaptic_uid, synapses)
}

/// Build synapses from parallel arrays. All three must have the same length.
pub fn from_arrays<S: SynapseModel>(
    presynaptic_uid: Option<Uid>,
    postsynaptic_uid: Uid,
    sources: &[u32],
    targets: &[u32],
    params: Vec<S>,
) -> Result<Projection<S>> {
    if sources.len() != targets.len() || sources.len() != params.len() {
        return Err(SpikenetError::MalformedInput(format!(
            "synapse arrays differ in length: {} sources, {} targets, {} parameter sets",
            sources.len(),
            targets.len(),
            params.len()
        )));
    }
    let synapses = params
        .into_iter()
        .zip(sources.iter().zip(targets))
        .map(|(params, (&source, &target))| Synapse::new(params, source, target))
        .collect();
    Ok(Projection::new(presynaptic_uid, postsynaptic_uid, synapses))
}

/// Per-step decay factor for exponential relaxation with time constant
/// `tau` steps: `exp(-1 / tau)`
pub fn decay_from_characteristic_time(tau: f32) -> Result<f32> {
    if tau.is_nan() || tau <= 0.0 || tau.is_infinite() {
        return Err(SpikenetError::MalformedInput(format!(
            "characteristic time must be positive and finite, got {}",
            tau
        )));
    }
    Ok((-1.0 / tau).exp())
}
