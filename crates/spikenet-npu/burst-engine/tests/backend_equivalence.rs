// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0
//! Single- and multi-threaded backends must produce identical spike trains
//! and identical learned weights.

use spikenet_npu_burst_engine::{Backend, MultiThreadedBackend, SingleThreadedBackend};
use spikenet_npu_messaging::{InputChannel, SpikeMessage};
use spikenet_npu_network::generators::{all_to_all, one_to_one};
use spikenet_npu_network::{Network, Population, ProjectionVariant};
use spikenet_npu_neural::{
    BlifatNeuron, DeltaSynapse, OutputType, ResourceStdpDeltaSynapse, Step, SynapticResourceNeuron, Uid,
};

const INPUT_SIZE: usize = 20;
const HIDDEN_SIZE: usize = 17;
const OUTPUT_SIZE: usize = 11;
const STEPS: Step = 40;

struct Fixture {
    network: Network,
    input_projection: Uid,
    observed: Vec<Uid>,
}

fn plastic_neuron(index: usize) -> SynapticResourceNeuron {
    SynapticResourceNeuron {
        isi_max: 4,
        hebbian_coefficient: 0.05,
        resource_drain_coefficient: 0.5,
        synaptic_resource_threshold: 0.2,
        stability_change_parameter: 0.01,
        ..SynapticResourceNeuron::new(BlifatNeuron {
            potential_decay: 0.6,
            threshold_decay: 0.8,
            threshold_increment: 0.2,
            absolute_refractory_period: (index % 3) as u32,
            activation_threshold: 1.0 + (index % 4) as f32 * 0.1,
            ..BlifatNeuron::default()
        })
    }
}

fn build_fixture() -> Fixture {
    let mut network = Network::new();
    let sensory = network.add_population(Population::from_fn(INPUT_SIZE, |_| BlifatNeuron::default()));
    let hidden = network.add_population(Population::from_fn(HIDDEN_SIZE, plastic_neuron));
    let output = network.add_population(Population::from_fn(OUTPUT_SIZE, plastic_neuron));

    let input_projection = network.add_projection(one_to_one(None, sensory, INPUT_SIZE, |_| {
        DeltaSynapse::excitatory(1.5, 1)
    }));
    network.add_projection(all_to_all(Some(sensory), hidden, INPUT_SIZE, HIDDEN_SIZE, |source, target| {
        let weight = 0.05 + ((source * 7 + target * 3) % 11) as f32 * 0.02;
        ResourceStdpDeltaSynapse::new(weight, 1 + (source + target) % 3, OutputType::Excitatory, 0.0, 1.0, -0.01, 0)
    }));
    network.add_projection(all_to_all(Some(hidden), output, HIDDEN_SIZE, OUTPUT_SIZE, |source, target| {
        let weight = 0.1 + ((source + target * 5) % 7) as f32 * 0.03;
        ResourceStdpDeltaSynapse::new(weight, 1 + (source * target) % 4, OutputType::Excitatory, 0.0, 1.0, 0.0, 2)
    }));
    network.add_projection(all_to_all(Some(output), hidden, OUTPUT_SIZE, HIDDEN_SIZE, |source, target| {
        DeltaSynapse::new(0.05 * ((source + target) % 3) as f32, 2, OutputType::Inhibitory)
    }));

    Fixture {
        network,
        input_projection,
        observed: vec![sensory, hidden, output],
    }
}

fn input_pattern(step: Step) -> Vec<u32> {
    (0..INPUT_SIZE as u32)
        .filter(|&i| (u64::from(i) * 7 + step * 3) % 5 == 0)
        .collect()
}

/// Spikes as `(step, population, neuron indexes)` plus final plastic weights
fn simulate(backend: &mut dyn Backend, fixture: &Fixture) -> (Vec<(Step, Uid, Vec<u32>)>, Vec<f32>) {
    backend.load_network(fixture.network.clone()).unwrap();

    let mut channel = InputChannel::new(Uid::new(), backend.message_bus().create_endpoint(), input_pattern);
    backend
        .subscribe_input(fixture.input_projection, &[channel.uid()])
        .unwrap();

    let observer_uid = Uid::new();
    let mut observer = backend.message_bus().create_endpoint();
    observer.subscribe::<SpikeMessage>(observer_uid, fixture.observed.iter().copied());

    let mut spikes = Vec::new();
    for step in 0..STEPS {
        channel.send(step);
        backend.step().unwrap();
        observer.receive_all();
        let mut messages = observer.unload_messages::<SpikeMessage>(observer_uid);
        messages.sort_by_key(|m| (m.header.send_time, m.header.sender_uid.to_string()));
        spikes.extend(
            messages
                .into_iter()
                .map(|m| (m.header.send_time, m.header.sender_uid, m.neuron_indexes)),
        );
    }

    let weights = backend
        .get_network_data()
        .projections()
        .filter_map(|projection| match projection {
            ProjectionVariant::SynapticResourceDelta(p) => Some(p.synapses().iter().map(|s| s.params.delta.weight)),
            ProjectionVariant::Delta(_) => None,
        })
        .flatten()
        .collect();
    (spikes, weights)
}

#[test]
fn test_single_and_multi_threaded_backends_agree() {
    let fixture = build_fixture();

    let mut single = SingleThreadedBackend::new();
    let (single_spikes, single_weights) = simulate(&mut single, &fixture);

    let mut multi = MultiThreadedBackend::with_part_sizes(4, 3, 7).unwrap();
    let (multi_spikes, multi_weights) = simulate(&mut multi, &fixture);

    assert!(!single_spikes.is_empty());
    assert!(single_spikes.iter().any(|(_, uid, _)| *uid == fixture.observed[1]));
    assert_eq!(single_spikes, multi_spikes);
    assert_eq!(single_weights, multi_weights);
}

#[test]
fn test_multi_threaded_runs_are_reproducible() {
    let fixture = build_fixture();

    let mut first = MultiThreadedBackend::with_part_sizes(3, 2, 5).unwrap();
    let mut second = MultiThreadedBackend::with_part_sizes(3, 2, 5).unwrap();
    assert_eq!(simulate(&mut first, &fixture), simulate(&mut second, &fixture));
}

#[test]
fn test_zero_part_size_is_rejected() {
    assert!(MultiThreadedBackend::with_part_sizes(1, 0, 10).is_err());
    assert!(MultiThreadedBackend::with_part_sizes(1, 10, 0).is_err());
}
