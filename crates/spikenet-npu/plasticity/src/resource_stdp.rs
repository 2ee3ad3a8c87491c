// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-synapse resource update rule
//!
//! ```text
//! On a presynaptic spike at step s (elapsed e = s - last evaluation):
//!     skip if e < dopamine_plasticity_period
//!     Δr = d_u + hebbian - drain × e / (e + isi_max)
//!     hebbian = hebbian_coefficient × min(2^-stability, 1)
//!               if the postsynaptic neuron fired within isi_max, else 0
//! ```

use spikenet_npu_neural::{ResourceStdpDeltaSynapse, Step, Synapse, SynapticResourceNeuron};

/// Resource a synapse drew from its postsynaptic neuron's free pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceDebit {
    pub postsynaptic_neuron_index: u32,
    pub amount: f32,
}

/// Evaluate the rule for a synapse that transmitted a spike at `step`.
///
/// `postsynaptic` is `None` when the target population has no plasticity
/// state, in which case only the unconditional term applies. Returns the
/// Hebbian amount to debit from the postsynaptic neuron, if any.
pub fn on_presynaptic_spike(
    synapse: &mut Synapse<ResourceStdpDeltaSynapse>,
    postsynaptic: Option<&SynapticResourceNeuron>,
    step: Step,
) -> Option<ResourceDebit> {
    let rule = &mut synapse.params.rule;
    if rule.within_dopamine_period(step) {
        return None;
    }
    let elapsed = rule.elapsed(step);

    let mut debit = None;
    let mut delta = rule.d_u;
    if let Some(neuron) = postsynaptic {
        if neuron.spiked_within_isi(step) {
            let hebbian = neuron.hebbian_coefficient * neuron.hebbian_scale();
            delta += hebbian;
            if hebbian != 0.0 {
                debit = Some(ResourceDebit {
                    postsynaptic_neuron_index: synapse.target,
                    amount: hebbian,
                });
            }
        }
        if elapsed > 0 {
            let elapsed = elapsed as f32;
            delta -= neuron.resource_drain_coefficient * elapsed / (elapsed + neuron.isi_max as f32);
        }
    }

    rule.add_resource(delta);
    rule.last_spike_step = Some(step);
    synapse.params.sync_weight();
    debit
}

/// Reinforce a synapse evaluated within its dopamine plasticity period by
/// `dopamine × hebbian_coefficient`. Returns whether the synapse changed.
pub fn apply_dopamine(
    synapse: &mut Synapse<ResourceStdpDeltaSynapse>,
    postsynaptic: &SynapticResourceNeuron,
    step: Step,
) -> bool {
    let dopamine = postsynaptic.base.dopamine_value;
    if dopamine == 0.0 || !synapse.params.rule.within_dopamine_period(step) {
        return false;
    }
    synapse
        .params
        .rule
        .add_resource(dopamine * postsynaptic.hebbian_coefficient);
    synapse.params.sync_weight();
    true
}
