// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Free-resource bookkeeping on the postsynaptic side

use spikenet_npu_neural::{ResourceStdpDeltaSynapse, Synapse, SynapticResourceNeuron};
use tracing::trace;

use crate::resource_stdp::ResourceDebit;

/// Subtract Hebbian debits from the free resource of their neurons.
/// Debits addressing a missing neuron are ignored.
pub fn apply_resource_debits(neurons: &mut [SynapticResourceNeuron], debits: &[ResourceDebit]) {
    for debit in debits {
        if let Some(neuron) = neurons.get_mut(debit.postsynaptic_neuron_index as usize) {
            neuron.free_synaptic_resource -= debit.amount;
        }
    }
}

/// Redistribute free resource over incoming plastic synapses.
///
/// Every neuron with `|free| ≥ synaptic_resource_threshold` gives each of
/// its `n` incoming synapses `free / (n + resource_drain_coefficient)` and
/// its free resource is reset to 0. `incoming` holds the synapses of all
/// plastic projections that target this population. Returns the number of
/// neurons renormalized.
pub fn renormalize_population(
    neurons: &mut [SynapticResourceNeuron],
    incoming: &mut [&mut [Synapse<ResourceStdpDeltaSynapse>]],
) -> usize {
    let mut synapse_counts = vec![0u32; neurons.len()];
    for synapse in incoming.iter().flat_map(|synapses| synapses.iter()) {
        if let Some(count) = synapse_counts.get_mut(synapse.target as usize) {
            *count += 1;
        }
    }

    let shares: Vec<Option<f32>> = neurons
        .iter()
        .zip(&synapse_counts)
        .map(|(neuron, &count)| {
            let free = neuron.free_synaptic_resource;
            let denominator = count as f32 + neuron.resource_drain_coefficient;
            (free.abs() >= neuron.synaptic_resource_threshold && denominator > 0.0)
                .then(|| free / denominator)
        })
        .collect();

    let renormalized = shares.iter().filter(|share| share.is_some()).count();
    if renormalized == 0 {
        return 0;
    }

    for synapse in incoming.iter_mut().flat_map(|synapses| synapses.iter_mut()) {
        if let Some(Some(share)) = shares.get(synapse.target as usize) {
            synapse.params.rule.add_resource(*share);
            synapse.params.sync_weight();
        }
    }
    for (neuron, share) in neurons.iter_mut().zip(&shares) {
        if share.is_some() {
            neuron.free_synaptic_resource = 0.0;
        }
    }

    trace!("[PLASTICITY] Renormalized free resource of {} neuron(s)", renormalized);
    renormalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_npu_neural::{BlifatNeuron, OutputType};

    fn synapse(target: u32) -> Synapse<ResourceStdpDeltaSynapse> {
        Synapse::new(
            ResourceStdpDeltaSynapse::new(0.5, 1, OutputType::Excitatory, 0.0, 1.0, 0.0, 0),
            0,
            target,
        )
    }

    fn neuron(free: f32, threshold: f32) -> SynapticResourceNeuron {
        SynapticResourceNeuron {
            free_synaptic_resource: free,
            synaptic_resource_threshold: threshold,
            resource_drain_coefficient: 1.0,
            ..SynapticResourceNeuron::new(BlifatNeuron::default())
        }
    }

    #[test]
    fn test_debits_reduce_free_resource() {
        let mut neurons = vec![neuron(0.0, 1.0), neuron(0.0, 1.0)];
        apply_resource_debits(
            &mut neurons,
            &[
                ResourceDebit {
                    postsynaptic_neuron_index: 1,
                    amount: 0.3,
                },
                ResourceDebit {
                    postsynaptic_neuron_index: 7,
                    amount: 1.0,
                },
            ],
        );
        assert_eq!(neurons[0].free_synaptic_resource, 0.0);
        assert!((neurons[1].free_synaptic_resource + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_free_resource_is_shared_across_incoming_synapses() {
        let mut neurons = vec![neuron(-3.0, 1.0), neuron(0.5, 1.0)];
        let mut first = vec![synapse(0), synapse(1)];
        let mut second = vec![synapse(0)];
        let before = first[0].params.rule.synaptic_resource;

        let renormalized = renormalize_population(&mut neurons, &mut [&mut first[..], &mut second[..]]);
        assert_eq!(renormalized, 1);

        // Two incoming synapses plus drain 1.0: share = -3 / 3
        assert!((first[0].params.rule.synaptic_resource - (before - 1.0)).abs() < 1e-6);
        assert!((second[0].params.rule.synaptic_resource - (before - 1.0)).abs() < 1e-6);
        assert_eq!(first[1].params.rule.synaptic_resource, before);
        assert_eq!(neurons[0].free_synaptic_resource, 0.0);
        assert_eq!(neurons[1].free_synaptic_resource, 0.5);
        assert!(first[0].params.delta.weight < 0.5);
    }
}
