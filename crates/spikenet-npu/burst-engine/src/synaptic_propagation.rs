// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Synaptic Propagation
//!
//! Turns the spikes received by a projection into delayed synaptic impacts:
//!
//! ```text
//! for every synapse whose source fired at step s:
//!     impact(amplitude = weight, synapse index, target)
//!     delivered at s + max(delay, 1)
//!     plastic synapses also run the resource rule (learning on)
//! ```
//!
//! Impacts wait in a per-projection [`DelayQueue`]. At step `s` every entry
//! due at or before `s + 1` leaves as one [`SynapticImpactMessage`] per
//! delivery step and output type, stamped with the delivery step, and is
//! consumed by the postsynaptic population during that step.

use std::collections::BTreeMap;

use ahash::AHashSet;
use spikenet_npu_messaging::{MessageHeader, SynapticImpact, SynapticImpactMessage};
use spikenet_npu_network::Projection;
use spikenet_npu_neural::{
    DeltaSynapse, OutputType, ResourceStdpDeltaSynapse, Step, Synapse, SynapseModel,
    SynapticResourceNeuron, Uid,
};
use spikenet_npu_plasticity::{apply_dopamine, on_presynaptic_spike, ResourceDebit};

use crate::executor::Executor;

/// Step at which an impact from a spike at `step` reaches its target.
/// `load_network` rejects a delay of 0; one loaded without validation is
/// treated as 1.
pub fn delivery_step(step: Step, delay: u32) -> Step {
    step.saturating_add(u64::from(delay.max(1)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledImpact {
    pub delivery_step: Step,
    pub output_type: OutputType,
    pub impact: SynapticImpact,
}

/// Impacts and resource debits produced by one part of a projection
#[derive(Debug, Clone, Default)]
pub struct PropagationOutput {
    pub impacts: Vec<ScheduledImpact>,
    pub debits: Vec<ResourceDebit>,
}

/// Impacts that leave the queue together as one message
#[derive(Debug, Clone, PartialEq)]
pub struct DueImpacts {
    pub delivery_step: Step,
    pub output_type: OutputType,
    pub impacts: Vec<SynapticImpact>,
}

impl DueImpacts {
    pub fn into_message(
        self,
        sender_uid: Uid,
        presynaptic_population_uid: Option<Uid>,
        postsynaptic_population_uid: Uid,
    ) -> SynapticImpactMessage {
        SynapticImpactMessage {
            header: MessageHeader {
                sender_uid,
                send_time: self.delivery_step,
            },
            presynaptic_population_uid,
            postsynaptic_population_uid,
            output_type: self.output_type,
            impacts: self.impacts,
        }
    }
}

/// Pending impacts of one projection, keyed by delivery step
#[derive(Debug, Clone, Default)]
pub struct DelayQueue {
    pending: BTreeMap<Step, Vec<(OutputType, Vec<SynapticImpact>)>>,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, scheduled: ScheduledImpact) {
        let batches = self.pending.entry(scheduled.delivery_step).or_default();
        match batches
            .iter_mut()
            .find(|(output_type, _)| *output_type == scheduled.output_type)
        {
            Some((_, impacts)) => impacts.push(scheduled.impact),
            None => batches.push((scheduled.output_type, vec![scheduled.impact])),
        }
    }

    pub fn extend(&mut self, scheduled: impl IntoIterator<Item = ScheduledImpact>) {
        for impact in scheduled {
            self.schedule(impact);
        }
    }

    /// Remove every entry due at or before `horizon`, earliest first
    pub fn take_due(&mut self, horizon: Step) -> Vec<DueImpacts> {
        let later = self.pending.split_off(&horizon.saturating_add(1));
        let due = std::mem::replace(&mut self.pending, later);
        due.into_iter()
            .flat_map(|(delivery_step, batches)| {
                batches.into_iter().map(move |(output_type, impacts)| DueImpacts {
                    delivery_step,
                    output_type,
                    impacts,
                })
            })
            .collect()
    }

    /// Number of distinct delivery steps still pending
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn impact_count(&self) -> usize {
        self.pending
            .values()
            .flat_map(|batches| batches.iter())
            .map(|(_, impacts)| impacts.len())
            .sum()
    }

    pub fn next_delivery_step(&self) -> Option<Step> {
        self.pending.keys().next().copied()
    }
}

fn transmit_part<S: SynapseModel>(
    offset: usize,
    part: &mut [Synapse<S>],
    spiked: &AHashSet<u32>,
    step: Step,
    mut on_transmit: impl FnMut(&mut Synapse<S>) -> Option<ResourceDebit>,
) -> PropagationOutput {
    let mut output = PropagationOutput::default();
    for (i, synapse) in part.iter_mut().enumerate() {
        if !spiked.contains(&synapse.source) {
            continue;
        }
        // Amplitude is the weight before this spike's own update
        output.impacts.push(ScheduledImpact {
            delivery_step: delivery_step(step, synapse.params.delay()),
            output_type: synapse.params.output_type(),
            impact: SynapticImpact {
                amplitude: synapse.params.weight(),
                synapse_index: (offset + i) as u32,
                postsynaptic_neuron_index: synapse.target,
            },
        });
        if let Some(debit) = on_transmit(synapse) {
            output.debits.push(debit);
        }
    }
    output
}

pub fn propagate_delta(
    projection: &mut Projection<DeltaSynapse>,
    spiked: &AHashSet<u32>,
    step: Step,
    executor: &Executor<'_>,
    part_size: usize,
) -> Vec<PropagationOutput> {
    if spiked.is_empty() {
        return Vec::new();
    }
    executor.run_chunks(projection.synapses_mut(), part_size, |offset, part| {
        transmit_part(offset, part, spiked, step, |_| None)
    })
}

/// Propagate spikes through a resource-STDP projection.
///
/// `postsynaptic` holds the target neurons when they carry plasticity state.
/// With `learning` off the synapses behave like plain delta synapses.
pub fn propagate_resource_stdp(
    projection: &mut Projection<ResourceStdpDeltaSynapse>,
    postsynaptic: Option<&[SynapticResourceNeuron]>,
    spiked: &AHashSet<u32>,
    step: Step,
    learning: bool,
    executor: &Executor<'_>,
    part_size: usize,
) -> Vec<PropagationOutput> {
    let dopamine = learning
        && postsynaptic.is_some_and(|neurons| neurons.iter().any(|n| n.base.dopamine_value != 0.0));
    if spiked.is_empty() && !dopamine {
        return Vec::new();
    }

    let target = |index: u32| postsynaptic.and_then(|neurons| neurons.get(index as usize));
    executor.run_chunks(projection.synapses_mut(), part_size, |offset, part| {
        let output = transmit_part(offset, part, spiked, step, |synapse| {
            if learning {
                on_presynaptic_spike(synapse, target(synapse.target), step)
            } else {
                None
            }
        });
        if dopamine {
            for synapse in part.iter_mut() {
                if let Some(neuron) = target(synapse.target) {
                    apply_dopamine(synapse, neuron, step);
                }
            }
        }
        output
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_npu_neural::BlifatNeuron;

    fn impact(target: u32) -> SynapticImpact {
        SynapticImpact {
            amplitude: 1.0,
            synapse_index: target,
            postsynaptic_neuron_index: target,
        }
    }

    #[test]
    fn test_zero_delay_is_delivered_next_step() {
        assert_eq!(delivery_step(4, 0), 5);
        assert_eq!(delivery_step(4, 1), 5);
        assert_eq!(delivery_step(4, 3), 7);
    }

    #[test]
    fn test_take_due_respects_horizon() {
        let mut queue = DelayQueue::new();
        for (step, target) in [(3, 0), (5, 1), (4, 2), (3, 3)] {
            queue.schedule(ScheduledImpact {
                delivery_step: step,
                output_type: OutputType::Excitatory,
                impact: impact(target),
            });
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.impact_count(), 4);

        let due = queue.take_due(4);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].delivery_step, 3);
        assert_eq!(due[0].impacts.len(), 2);
        assert_eq!(due[1].delivery_step, 4);
        assert_eq!(queue.next_delivery_step(), Some(5));
    }

    #[test]
    fn test_output_types_leave_as_separate_batches() {
        let mut queue = DelayQueue::new();
        queue.extend([
            ScheduledImpact {
                delivery_step: 1,
                output_type: OutputType::Excitatory,
                impact: impact(0),
            },
            ScheduledImpact {
                delivery_step: 1,
                output_type: OutputType::Inhibitory,
                impact: impact(1),
            },
        ]);
        let due = queue.take_due(1);
        assert_eq!(due.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_due_impacts_message_is_stamped_with_delivery_step() {
        let sender = Uid::new();
        let post = Uid::new();
        let message = DueImpacts {
            delivery_step: 9,
            output_type: OutputType::Dopamine,
            impacts: vec![impact(2)],
        }
        .into_message(sender, None, post);
        assert_eq!(message.header.sender_uid, sender);
        assert_eq!(message.header.send_time, 9);
        assert_eq!(message.postsynaptic_population_uid, post);
        assert_eq!(message.output_type, OutputType::Dopamine);
    }

    #[test]
    fn test_delta_only_spiked_sources_transmit() {
        let mut projection = Projection::new(
            None,
            Uid::new(),
            vec![
                Synapse::new(DeltaSynapse::excitatory(0.5, 2), 0, 0),
                Synapse::new(DeltaSynapse::excitatory(0.7, 1), 1, 1),
                Synapse::new(DeltaSynapse::excitatory(0.9, 1), 0, 2),
            ],
        );
        let spiked: AHashSet<u32> = [0].into_iter().collect();
        let outputs = propagate_delta(&mut projection, &spiked, 10, &Executor::Sequential, 2);
        let impacts: Vec<ScheduledImpact> = outputs.into_iter().flat_map(|o| o.impacts).collect();
        assert_eq!(impacts.len(), 2);
        assert_eq!(impacts[0].delivery_step, 12);
        assert_eq!(impacts[0].impact.amplitude, 0.5);
        assert_eq!(impacts[1].impact.synapse_index, 2);
        assert_eq!(impacts[1].delivery_step, 11);
    }

    #[test]
    fn test_resource_stdp_learning_toggle() {
        let make = || {
            Projection::new(
                None,
                Uid::new(),
                vec![Synapse::new(
                    ResourceStdpDeltaSynapse::new(0.5, 1, OutputType::Excitatory, 0.0, 1.0, 0.1, 0),
                    0,
                    0,
                )],
            )
        };
        let spiked: AHashSet<u32> = [0].into_iter().collect();
        let neurons = vec![SynapticResourceNeuron::new(BlifatNeuron::default())];

        let mut frozen = make();
        propagate_resource_stdp(&mut frozen, Some(neurons.as_slice()), &spiked, 1, false, &Executor::Sequential, 8);
        assert_eq!(frozen.synapses()[0].params.weight(), 0.5);

        let mut learning = make();
        let outputs =
            propagate_resource_stdp(&mut learning, Some(neurons.as_slice()), &spiked, 1, true, &Executor::Sequential, 8);
        assert_eq!(outputs[0].impacts[0].impact.amplitude, 0.5);
        assert!(learning.synapses()[0].params.weight() > 0.5);
    }
}
