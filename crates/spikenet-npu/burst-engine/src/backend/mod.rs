// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Backend Abstraction
//!
//! A backend owns a loaded network, its own [`MessageBus`] and the step
//! counter. Backends differ only in how a step's parts are executed, so the
//! whole API is provided on top of [`BackendCore`] and each backend only
//! implements [`Backend::step`].

mod shared;
mod multi_threaded;
mod single_threaded;

pub use shared::{BackendCore, NetworkData};
pub use multi_threaded::MultiThreadedBackend;
pub use single_threaded::SingleThreadedBackend;

use spikenet_config::{BackendKind, SpikenetConfig};
use spikenet_npu_messaging::MessageBus;
use spikenet_npu_network::{Network, PopulationVariant, ProjectionVariant};
use spikenet_npu_neural::{Result, Step, Uid};
use tracing::info;

/// Simulation backend (single-threaded CPU, multi-threaded CPU)
pub trait Backend: Send {
    /// Backend type name for logging/debugging
    fn backend_name(&self) -> &'static str;

    fn core(&self) -> &BackendCore;

    fn core_mut(&mut self) -> &mut BackendCore;

    /// Compute one step. Returns the index of the step just computed.
    fn step(&mut self) -> Result<Step>;

    /// Replace the loaded populations. No validation.
    fn load_populations(&mut self, populations: Vec<PopulationVariant>) {
        self.core_mut().load_populations(populations);
    }

    /// Replace the loaded projections, dropping their pending impacts
    fn load_projections(&mut self, projections: Vec<ProjectionVariant>) {
        self.core_mut().load_projections(projections);
    }

    /// Validate a whole network and add it to the loaded one
    fn load_network(&mut self, network: Network) -> Result<()> {
        self.core_mut().load_network(network)
    }

    /// Index of the next step to compute
    fn get_step(&self) -> Step {
        self.core().step()
    }

    fn get_network_data(&self) -> NetworkData<'_> {
        self.core().network_data()
    }

    fn extract_network(&self, population_uids: &[Uid], projection_uids: &[Uid]) -> Network {
        self.core().extract_network(population_uids, projection_uids)
    }

    fn get_population(&self, uid: Uid) -> Result<&PopulationVariant> {
        self.core().population(uid)
    }

    fn get_projection(&self, uid: Uid) -> Result<&ProjectionVariant> {
        self.core().projection(uid)
    }

    /// Freeze synaptic plasticity. Neuron dynamics keep running.
    fn stop_learning(&mut self) {
        self.core_mut().set_learning(false);
    }

    fn start_learning(&mut self) {
        self.core_mut().set_learning(true);
    }

    fn is_learning(&self) -> bool {
        self.core().is_learning()
    }

    /// Bus used for external input and observation
    fn message_bus(&self) -> &MessageBus {
        self.core().message_bus()
    }

    /// Route spikes sent by `channel_uids` into `projection_uid`
    fn subscribe_input(&mut self, projection_uid: Uid, channel_uids: &[Uid]) -> Result<()> {
        self.core_mut().subscribe_input(projection_uid, channel_uids)
    }
}

/// Build the backend selected by `config`
pub fn create_backend(config: &SpikenetConfig) -> Result<Box<dyn Backend>> {
    let mut backend: Box<dyn Backend> = match config.backend.kind {
        BackendKind::SingleThreaded => Box::new(SingleThreadedBackend::new()),
        BackendKind::MultiThreaded => Box::new(MultiThreadedBackend::with_part_sizes(
            config.backend.thread_count,
            config.backend.population_part_size,
            config.backend.projection_part_size,
        )?),
    };
    if !config.plasticity.enabled {
        backend.stop_learning();
    }
    info!(
        "[BACKEND] Created {} backend (learning: {})",
        backend.backend_name(),
        backend.is_learning()
    );
    Ok(backend)
}
