// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Population Dynamics
//!
//! One population step:
//!
//! ```text
//! 1. pre-impact update   (parallel over parts)
//! 2. apply impacts       (message order, sequential)
//! 3. post-impact update  (parallel over parts) → indexes of fired neurons
//! ```
//!
//! Impacts addressing a neuron index outside the population are skipped.

use spikenet_npu_messaging::SynapticImpactMessage;
use spikenet_npu_network::Population;
use spikenet_npu_neural::{NeuronModel, Step};
use tracing::warn;

use crate::executor::Executor;

/// Advance `population` by one step and return the indexes that fired,
/// ascending.
pub fn calculate_population<N: NeuronModel>(
    population: &mut Population<N>,
    messages: &[SynapticImpactMessage],
    step: Step,
    executor: &Executor<'_>,
    part_size: usize,
) -> Vec<u32> {
    let neurons = population.neurons_mut();

    executor.run_chunks(neurons, part_size, |_, part| {
        for neuron in part.iter_mut() {
            neuron.pre_impact_update();
        }
    });

    let skipped = apply_impacts(neurons, messages);
    if skipped > 0 {
        warn!(
            "[POPULATION] {} impact(s) addressed neurons outside population {}",
            skipped,
            population.uid()
        );
    }

    let neurons = population.neurons_mut();
    executor
        .run_chunks(neurons, part_size, |offset, part| {
            part.iter_mut()
                .enumerate()
                .filter_map(|(i, neuron)| neuron.post_impact_update(step).then_some((offset + i) as u32))
                .collect::<Vec<u32>>()
        })
        .concat()
}

/// Apply every impact of every message in order. Returns how many impacts
/// were skipped for an out-of-range target.
pub fn apply_impacts<N: NeuronModel>(neurons: &mut [N], messages: &[SynapticImpactMessage]) -> usize {
    let mut skipped = 0;
    for message in messages {
        for impact in &message.impacts {
            match neurons.get_mut(impact.postsynaptic_neuron_index as usize) {
                Some(neuron) => neuron.apply_impact(impact.amplitude, message.output_type),
                None => skipped += 1,
            }
        }
    }
    skipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_npu_messaging::{MessageHeader, SynapticImpact};
    use spikenet_npu_neural::{BlifatNeuron, OutputType, Uid};

    fn impact_message(output_type: OutputType, targets: &[(u32, f32)]) -> SynapticImpactMessage {
        SynapticImpactMessage {
            header: MessageHeader {
                sender_uid: Uid::new(),
                send_time: 0,
            },
            presynaptic_population_uid: None,
            postsynaptic_population_uid: Uid::new(),
            output_type,
            impacts: targets
                .iter()
                .enumerate()
                .map(|(i, &(target, amplitude))| SynapticImpact {
                    amplitude,
                    synapse_index: i as u32,
                    postsynaptic_neuron_index: target,
                })
                .collect(),
        }
    }

    #[test]
    fn test_fires_only_impacted_neurons() {
        let mut population = Population::from_fn(8, |_| BlifatNeuron::default());
        let messages = [impact_message(OutputType::Excitatory, &[(1, 2.0), (6, 2.0)])];
        let fired = calculate_population(&mut population, &messages, 0, &Executor::Sequential, 3);
        assert_eq!(fired, vec![1, 6]);
    }

    #[test]
    fn test_no_impacts_no_spikes() {
        let mut population = Population::from_fn(4, |_| BlifatNeuron::default());
        let fired = calculate_population(&mut population, &[], 0, &Executor::Sequential, 4);
        assert!(fired.is_empty());
    }

    #[test]
    fn test_out_of_range_impact_is_skipped() {
        let mut neurons = vec![BlifatNeuron::default(); 2];
        let messages = [impact_message(OutputType::Excitatory, &[(0, 0.5), (9, 1.0)])];
        assert_eq!(apply_impacts(&mut neurons, &messages), 1);
        assert_eq!(neurons[0].potential, 0.5);
    }

    #[test]
    fn test_inhibitory_message_cancels_excitation() {
        let mut population = Population::from_fn(1, |_| BlifatNeuron::default());
        let messages = [
            impact_message(OutputType::Excitatory, &[(0, 1.5)]),
            impact_message(OutputType::Inhibitory, &[(0, 1.0)]),
        ];
        let fired = calculate_population(&mut population, &messages, 0, &Executor::Sequential, 1);
        assert!(fired.is_empty());
    }
}
