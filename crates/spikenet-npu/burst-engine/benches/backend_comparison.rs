// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Backend Performance Benchmarks
//!
//! Steps a three-layer network with external input on the single-threaded
//! and multi-threaded backends at several sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spikenet_npu_burst_engine::{Backend, MultiThreadedBackend, SingleThreadedBackend};
use spikenet_npu_messaging::InputChannel;
use spikenet_npu_network::generators::{all_to_all, one_to_one};
use spikenet_npu_network::{Network, Population};
use spikenet_npu_neural::{
    BlifatNeuron, DeltaSynapse, OutputType, ResourceStdpDeltaSynapse, SynapticResourceNeuron, Uid,
};

/// Network of `size` input, hidden and output neurons. Returns the network
/// and the uid of the input projection.
fn create_test_network(size: usize) -> (Network, Uid) {
    let mut network = Network::new();
    let input = network.add_population(Population::from_fn(size, |_| BlifatNeuron::default()));
    let hidden = network.add_population(Population::from_fn(size, |_| {
        SynapticResourceNeuron::new(BlifatNeuron {
            potential_decay: 0.5,
            ..BlifatNeuron::default()
        })
    }));
    let output = network.add_population(Population::from_fn(size, |_| BlifatNeuron::default()));

    let input_projection = network.add_projection(one_to_one(None, input, size, |_| DeltaSynapse::excitatory(2.0, 1)));
    network.add_projection(all_to_all(Some(input), hidden, size, size, |_, _| {
        ResourceStdpDeltaSynapse::new(0.05, 1, OutputType::Excitatory, 0.0, 1.0, 0.001, 0)
    }));
    network.add_projection(all_to_all(Some(hidden), output, size, size, |source, target| {
        DeltaSynapse::excitatory(0.05, 1 + (source + target) % 3)
    }));
    (network, input_projection)
}

fn prepare(backend: &mut dyn Backend, size: usize) -> InputChannel {
    let (network, input_projection) = create_test_network(size);
    backend.load_network(network).unwrap();
    let channel = InputChannel::new(Uid::new(), backend.message_bus().create_endpoint(), move |step| {
        (0..size as u32).filter(|i| (*i as u64 + step) % 4 == 0).collect()
    });
    backend.subscribe_input(input_projection, &[channel.uid()]).unwrap();
    channel
}

fn step_with_input(backend: &mut dyn Backend, channel: &mut InputChannel) {
    channel.send(backend.get_step());
    black_box(backend.step().unwrap());
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backend_step");

    for size in [100usize, 300, 1000] {
        group.throughput(Throughput::Elements((size * size * 2) as u64));

        group.bench_with_input(BenchmarkId::new("single_threaded", size), &size, |b, &size| {
            let mut backend = SingleThreadedBackend::new();
            let mut channel = prepare(&mut backend, size);
            b.iter(|| step_with_input(&mut backend, &mut channel));
        });

        group.bench_with_input(BenchmarkId::new("multi_threaded", size), &size, |b, &size| {
            let mut backend = MultiThreadedBackend::new(0).unwrap();
            let mut channel = prepare(&mut backend, size);
            b.iter(|| step_with_input(&mut backend, &mut channel));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
