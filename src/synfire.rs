// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synfire chain: layers of BLIFAT neurons connected all-to-all in sequence,
//! driven by external input into the first layer and read out through a
//! plastic one-to-one projection.
//!
//! ```text
//! input ─▶ layer-0 ─▶ layer-1 ─▶ … ─▶ layer-(n-1) ══▶ readout
//!                                        (resource STDP)
//! ```

use spikenet_npu_network::generators::{all_to_all, decay_from_characteristic_time, one_to_one};
use spikenet_npu_network::{Network, Population};
use spikenet_npu_neural::{
    BlifatNeuron, DeltaSynapse, OutputType, ResourceStdpDeltaSynapse, Result, SpikenetError,
    SynapticResourceNeuron, Uid,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SynfireParams {
    pub layers: usize,
    pub layer_size: usize,
    /// Delay between consecutive layers, in steps
    pub layer_delay: u32,
    /// Membrane time constant, in steps
    pub membrane_tau: f32,
    /// Initial weight of the readout synapses
    pub readout_weight: f32,
    /// Resource added to a readout synapse on every transmitted spike
    pub readout_d_u: f32,
}

impl Default for SynfireParams {
    fn default() -> Self {
        Self {
            layers: 4,
            layer_size: 16,
            layer_delay: 1,
            membrane_tau: 4.0,
            readout_weight: 0.25,
            readout_d_u: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynfireChain {
    pub network: Network,
    /// Projection fed by the external input channel
    pub input_projection: Uid,
    pub layers: Vec<Uid>,
    pub readout: Uid,
    pub readout_projection: Uid,
    pub layer_size: usize,
}

impl SynfireChain {
    /// Human-readable label per population, in chain order
    pub fn labels(&self) -> Vec<(Uid, String)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(index, uid)| (*uid, format!("layer-{}", index)))
            .chain(std::iter::once((self.readout, "readout".to_string())))
            .collect()
    }
}

pub fn build_synfire_chain(params: &SynfireParams) -> Result<SynfireChain> {
    if params.layers == 0 || params.layer_size == 0 {
        return Err(SpikenetError::MalformedInput(format!(
            "synfire chain needs at least one layer of one neuron, got {} x {}",
            params.layers, params.layer_size
        )));
    }
    let potential_decay = decay_from_characteristic_time(params.membrane_tau)?;
    let neuron = BlifatNeuron {
        potential_decay,
        absolute_refractory_period: 1,
        ..BlifatNeuron::default()
    };
    let size = params.layer_size;

    let mut network = Network::new();
    network
        .tags_mut()
        .insert("generator".to_string(), format!("synfire-{}x{}", params.layers, size));
    let layers: Vec<Uid> = (0..params.layers)
        .map(|_| network.add_population(Population::from_fn(size, |_| neuron.clone())))
        .collect();
    let readout = network.add_population(Population::from_fn(size, |_| SynapticResourceNeuron {
        isi_max: 2,
        hebbian_coefficient: 0.1,
        resource_drain_coefficient: 0.02,
        synaptic_resource_threshold: 1.0,
        ..SynapticResourceNeuron::new(neuron.clone())
    }));

    let input_projection =
        network.add_projection(one_to_one(None, layers[0], size, |_| DeltaSynapse::excitatory(2.0, 1)));

    // A full volley of the previous layer drives the next one above threshold
    let layer_weight = 1.5 / size as f32;
    for pair in layers.windows(2) {
        network.add_projection(all_to_all(Some(pair[0]), pair[1], size, size, |_, _| {
            DeltaSynapse::excitatory(layer_weight, params.layer_delay)
        }));
    }

    let last = layers[layers.len() - 1];
    let readout_projection = network.add_projection(one_to_one(Some(last), readout, size, |_| {
        ResourceStdpDeltaSynapse::new(
            params.readout_weight,
            1,
            OutputType::Excitatory,
            0.0,
            2.0,
            params.readout_d_u,
            0,
        )
    }));

    Ok(SynfireChain {
        network,
        input_projection,
        layers,
        readout,
        readout_projection,
        layer_size: size,
    })
}
