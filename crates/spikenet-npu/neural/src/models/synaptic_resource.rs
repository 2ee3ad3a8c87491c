// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! BLIFAT neuron extended with the postsynaptic state used by
//! synaptic-resource STDP.
//!
//! On every spike the neuron measures its inter-spike interval (ISI). An ISI
//! within `isi_max` counts as a burst and raises stability; an isolated spike
//! lowers it. Stability later scales how much resource Hebbian updates may
//! move into the synapses that drove the spike.

use serde::{Deserialize, Serialize};

use super::blifat::BlifatNeuron;
use super::traits::NeuronModel;
use crate::types::{OutputType, Step};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapticResourceNeuron {
    pub base: BlifatNeuron,
    pub stability: f32,
    /// Resource not bound to any synapse. Negative when Hebbian updates
    /// borrowed more than was released.
    pub free_synaptic_resource: f32,
    /// `|free_synaptic_resource|` at which it is redistributed
    pub synaptic_resource_threshold: f32,
    pub last_spike_step: Option<Step>,
    pub hebbian_coefficient: f32,
    pub resource_drain_coefficient: f32,
    pub isi_max: u64,
    pub stability_change_parameter: f32,
    pub stability_change_at_isi: f32,
}

impl SynapticResourceNeuron {
    pub fn new(base: BlifatNeuron) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Whether the neuron fired within `isi_max` steps before `step`
    #[inline]
    pub fn spiked_within_isi(&self, step: Step) -> bool {
        match self.last_spike_step {
            Some(last) => last <= step && step - last <= self.isi_max,
            None => false,
        }
    }

    /// Multiplier applied to Hebbian resource transfer: `min(2^-stability, 1)`
    #[inline]
    pub fn hebbian_scale(&self) -> f32 {
        (-self.stability).exp2().min(1.0)
    }

    fn record_spike(&mut self, step: Step) {
        let isi = self.last_spike_step.map(|last| step.saturating_sub(last));
        match isi {
            Some(isi) if isi > 0 && isi <= self.isi_max => {
                self.stability += self.stability_change_parameter * self.stability_change_at_isi;
            }
            _ => self.stability -= self.stability_change_parameter,
        }
        self.last_spike_step = Some(step);
    }
}

impl Default for SynapticResourceNeuron {
    fn default() -> Self {
        Self {
            base: BlifatNeuron::default(),
            stability: 0.0,
            free_synaptic_resource: 0.0,
            synaptic_resource_threshold: f32::MAX,
            last_spike_step: None,
            hebbian_coefficient: 0.0,
            resource_drain_coefficient: 0.0,
            isi_max: 1,
            stability_change_parameter: 0.0,
            stability_change_at_isi: 1.0,
        }
    }
}

impl NeuronModel for SynapticResourceNeuron {
    const MODEL_NAME: &'static str = "SynapticResourceBLIFAT";

    #[inline]
    fn pre_impact_update(&mut self) {
        self.base.pre_impact_update();
    }

    #[inline]
    fn apply_impact(&mut self, amplitude: f32, output_type: OutputType) {
        self.base.apply_impact(amplitude, output_type);
    }

    #[inline]
    fn post_impact_update(&mut self, step: Step) -> bool {
        let fired = self.base.post_impact_update(step);
        if fired {
            self.record_spike(step);
        }
        fired
    }

    fn potential(&self) -> f32 {
        self.base.potential
    }

    fn dopamine_value(&self) -> f32 {
        self.base.dopamine_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_at(neuron: &mut SynapticResourceNeuron, step: Step) {
        neuron.pre_impact_update();
        neuron.apply_impact(10.0, OutputType::Excitatory);
        assert!(neuron.post_impact_update(step));
    }

    fn plastic_neuron() -> SynapticResourceNeuron {
        SynapticResourceNeuron {
            isi_max: 3,
            stability_change_parameter: 0.5,
            stability_change_at_isi: 2.0,
            ..SynapticResourceNeuron::new(BlifatNeuron::with_threshold(1.0))
        }
    }

    #[test]
    fn test_isolated_spike_lowers_stability() {
        let mut neuron = plastic_neuron();
        fire_at(&mut neuron, 5);
        assert_eq!(neuron.stability, -0.5);
        assert_eq!(neuron.last_spike_step, Some(5));
    }

    #[test]
    fn test_burst_spike_raises_stability() {
        let mut neuron = plastic_neuron();
        fire_at(&mut neuron, 5);
        fire_at(&mut neuron, 7);
        assert_eq!(neuron.stability, -0.5 + 1.0);
        fire_at(&mut neuron, 20);
        assert_eq!(neuron.stability, 0.0);
    }

    #[test]
    fn test_hebbian_scale_is_capped_at_one() {
        let mut neuron = plastic_neuron();
        neuron.stability = -3.0;
        assert_eq!(neuron.hebbian_scale(), 1.0);
        neuron.stability = 1.0;
        assert!((neuron.hebbian_scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_spiked_within_isi_window() {
        let mut neuron = plastic_neuron();
        assert!(!neuron.spiked_within_isi(4));
        fire_at(&mut neuron, 4);
        assert!(neuron.spiked_within_isi(4));
        assert!(neuron.spiked_within_isi(7));
        assert!(!neuron.spiked_within_isi(8));
    }
}
