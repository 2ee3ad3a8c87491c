// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! State and step pipeline shared by every backend

use ahash::{AHashMap, AHashSet};
use spikenet_npu_messaging::{Endpoint, MessageBus, MessageHeader, SpikeMessage, SynapticImpactMessage};
use spikenet_npu_network::{
    Network, Population, PopulationModel, PopulationVariant, Projection, ProjectionModel,
    ProjectionVariant,
};
use spikenet_npu_neural::{
    ResourceStdpDeltaSynapse, Result, SpikenetError, Step, Synapse, SynapticResourceNeuron, Uid,
};
use spikenet_npu_plasticity::{apply_resource_debits, renormalize_population, ResourceDebit};
use tracing::{debug, info, trace};

use crate::executor::Executor;
use crate::population_dynamics::calculate_population;
use crate::synaptic_propagation::{propagate_delta, propagate_resource_stdp, DelayQueue};

/// A loaded projection plus the impacts it still has to deliver
#[derive(Debug, Clone)]
pub(crate) struct ProjectionState {
    pub(crate) projection: ProjectionVariant,
    pub(crate) delay_queue: DelayQueue,
}

/// Read-only view of the network loaded in a backend
#[derive(Debug, Clone, Copy)]
pub struct NetworkData<'a> {
    populations: &'a [PopulationVariant],
    projections: &'a [ProjectionState],
}

impl<'a> NetworkData<'a> {
    pub fn populations(&self) -> impl Iterator<Item = &'a PopulationVariant> + 'a {
        self.populations.iter()
    }

    pub fn projections(&self) -> impl Iterator<Item = &'a ProjectionVariant> + 'a {
        self.projections.iter().map(|state| &state.projection)
    }

    pub fn population_count(&self) -> usize {
        self.populations.len()
    }

    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Impacts scheduled but not yet sent, over all projections
    pub fn pending_impact_count(&self) -> usize {
        self.projections
            .iter()
            .map(|state| state.delay_queue.impact_count())
            .sum()
    }
}

/// Entities, step counter, bus connection and learning switch of a backend
pub struct BackendCore {
    step: Step,
    populations: Vec<PopulationVariant>,
    projections: Vec<ProjectionState>,
    population_index: AHashMap<Uid, usize>,
    projection_index: AHashMap<Uid, usize>,
    /// External spike senders feeding each projection
    input_channels: AHashMap<Uid, Vec<Uid>>,
    bus: MessageBus,
    endpoint: Endpoint,
    learning: bool,
}

impl BackendCore {
    pub fn new() -> Self {
        let bus = MessageBus::new();
        let endpoint = bus.create_endpoint();
        Self {
            step: 0,
            populations: Vec::new(),
            projections: Vec::new(),
            population_index: AHashMap::new(),
            projection_index: AHashMap::new(),
            input_channels: AHashMap::new(),
            bus,
            endpoint,
            learning: true,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn message_bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn network_data(&self) -> NetworkData<'_> {
        NetworkData {
            populations: &self.populations,
            projections: &self.projections,
        }
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn set_learning(&mut self, enabled: bool) {
        if self.learning != enabled {
            info!(
                "[PLASTICITY] Learning {} at step {}",
                if enabled { "started" } else { "stopped" },
                self.step
            );
        }
        self.learning = enabled;
    }

    /// Replace every loaded population with `populations`
    pub fn load_populations(&mut self, populations: impl IntoIterator<Item = PopulationVariant>) {
        for population in self.populations.drain(..) {
            self.endpoint
                .unsubscribe::<SynapticImpactMessage>(population.uid());
        }
        self.population_index.clear();
        self.merge_populations(populations);
    }

    /// Replace every loaded projection with `projections`. Pending impacts
    /// of the old projections are dropped. Input channels stay attached to
    /// projections loaded again under the same uid.
    pub fn load_projections(&mut self, projections: impl IntoIterator<Item = ProjectionVariant>) {
        for state in self.projections.drain(..) {
            self.endpoint
                .unsubscribe::<SpikeMessage>(state.projection.uid());
        }
        self.projection_index.clear();
        self.merge_projections(projections);
        let projection_index = &self.projection_index;
        self.input_channels
            .retain(|uid, _| projection_index.contains_key(uid));
    }

    /// Add populations, replacing any loaded population with the same uid
    fn merge_populations(&mut self, populations: impl IntoIterator<Item = PopulationVariant>) {
        for population in populations {
            let uid = population.uid();
            match self.population_index.get(&uid) {
                Some(&index) => self.populations[index] = population,
                None => {
                    self.population_index.insert(uid, self.populations.len());
                    self.populations.push(population);
                }
            }
        }
        self.refresh_subscriptions();
    }

    /// Add projections, replacing any loaded projection with the same uid.
    /// A replaced projection starts with an empty delay queue.
    fn merge_projections(&mut self, projections: impl IntoIterator<Item = ProjectionVariant>) {
        for projection in projections {
            let uid = projection.uid();
            let state = ProjectionState {
                projection,
                delay_queue: DelayQueue::new(),
            };
            match self.projection_index.get(&uid) {
                Some(&index) => {
                    self.endpoint.unsubscribe::<SpikeMessage>(uid);
                    self.projections[index] = state;
                }
                None => {
                    self.projection_index.insert(uid, self.projections.len());
                    self.projections.push(state);
                }
            }
        }
        self.refresh_subscriptions();
    }

    /// Validate `network` against itself and the loaded entities, then add
    /// it to them. Entities sharing a uid with a loaded one replace it.
    pub fn load_network(&mut self, network: Network) -> Result<()> {
        let (populations, projections) = network.into_parts();

        let mut sizes: AHashMap<Uid, usize> = self
            .populations
            .iter()
            .map(|population| (population.uid(), population.len()))
            .collect();
        let mut seen = AHashSet::new();
        for population in &populations {
            if !seen.insert(population.uid()) {
                return Err(SpikenetError::InvalidNetwork(format!(
                    "duplicate population uid {}",
                    population.uid()
                )));
            }
            sizes.insert(population.uid(), population.len());
        }

        let mut seen = AHashSet::new();
        for projection in &projections {
            if !seen.insert(projection.uid()) {
                return Err(SpikenetError::InvalidNetwork(format!(
                    "duplicate projection uid {}",
                    projection.uid()
                )));
            }
            validate_projection(projection, &sizes)?;
        }

        info!(
            "[BACKEND] Loading {} population(s) and {} projection(s)",
            populations.len(),
            projections.len()
        );
        self.merge_populations(populations);
        self.merge_projections(projections);
        Ok(())
    }

    pub fn population(&self, uid: Uid) -> Result<&PopulationVariant> {
        self.population_index
            .get(&uid)
            .map(|&index| &self.populations[index])
            .ok_or(SpikenetError::PopulationNotFound(uid))
    }

    pub fn projection(&self, uid: Uid) -> Result<&ProjectionVariant> {
        self.projection_index
            .get(&uid)
            .map(|&index| &self.projections[index].projection)
            .ok_or(SpikenetError::ProjectionNotFound(uid))
    }

    /// Typed access to a loaded population
    pub fn population_as<N: PopulationModel>(&self, uid: Uid) -> Result<&Population<N>> {
        N::extract(self.population(uid)?).ok_or(SpikenetError::ModelMismatch {
            uid,
            expected: N::MODEL_NAME,
        })
    }

    /// Typed access to a loaded projection
    pub fn projection_as<S: ProjectionModel>(&self, uid: Uid) -> Result<&Projection<S>> {
        S::extract(self.projection(uid)?).ok_or(SpikenetError::ModelMismatch {
            uid,
            expected: S::MODEL_NAME,
        })
    }

    /// Copy the named entities out into a standalone network. Unknown uids
    /// are ignored; backend load order is preserved.
    pub fn extract_network(&self, population_uids: &[Uid], projection_uids: &[Uid]) -> Network {
        let population_uids: AHashSet<Uid> = population_uids.iter().copied().collect();
        let projection_uids: AHashSet<Uid> = projection_uids.iter().copied().collect();
        Network::from_parts(
            self.populations
                .iter()
                .filter(|population| population_uids.contains(&population.uid()))
                .cloned()
                .collect(),
            self.projections
                .iter()
                .filter(|state| projection_uids.contains(&state.projection.uid()))
                .map(|state| state.projection.clone())
                .collect(),
        )
    }

    /// Feed spikes sent by `channel_uids` into a loaded projection
    pub fn subscribe_input(&mut self, projection_uid: Uid, channel_uids: &[Uid]) -> Result<()> {
        if !self.projection_index.contains_key(&projection_uid) {
            return Err(SpikenetError::ProjectionNotFound(projection_uid));
        }
        let channels = self.input_channels.entry(projection_uid).or_default();
        for uid in channel_uids {
            if !channels.contains(uid) {
                channels.push(*uid);
            }
        }
        self.endpoint
            .subscribe::<SpikeMessage>(projection_uid, channel_uids.iter().copied());
        debug!(
            "[BACKEND] Projection {} now receives input from {} channel(s)",
            projection_uid,
            channels.len()
        );
        Ok(())
    }

    fn refresh_subscriptions(&mut self) {
        for state in &self.projections {
            let uid = state.projection.uid();
            let inputs = self.input_channels.get(&uid).into_iter().flatten().copied();
            self.endpoint
                .subscribe::<SpikeMessage>(uid, state.projection.presynaptic_uid().into_iter().chain(inputs));
        }

        let mut incoming: AHashMap<Uid, Vec<Uid>> = AHashMap::new();
        for state in &self.projections {
            incoming
                .entry(state.projection.postsynaptic_uid())
                .or_default()
                .push(state.projection.uid());
        }
        for population in &self.populations {
            let senders = incoming.remove(&population.uid()).unwrap_or_default();
            self.endpoint
                .subscribe::<SynapticImpactMessage>(population.uid(), senders);
        }
    }

    /// Run one full step and return the index of the step just computed
    pub(crate) fn run_step(
        &mut self,
        executor: &Executor<'_>,
        population_part_size: usize,
        projection_part_size: usize,
    ) -> Result<Step> {
        let step = self.step;
        debug!("[BACKEND] Starting step #{}", step);

        let fired = self.calculate_populations(executor, population_part_size);
        self.bus.route_messages();
        self.endpoint.receive_all();

        let sent = self.calculate_projections(executor, projection_part_size);
        self.bus.route_messages();
        self.endpoint.receive_all();

        trace!(
            "[BACKEND] Step #{} done: {} neuron(s) fired, {} impact message(s) sent",
            step,
            fired,
            sent
        );
        self.step += 1;
        Ok(step)
    }

    fn calculate_populations(&mut self, executor: &Executor<'_>, part_size: usize) -> usize {
        let step = self.step;
        let mut fired_total = 0;
        for population in self.populations.iter_mut() {
            let uid = population.uid();
            let messages = self.endpoint.unload_messages::<SynapticImpactMessage>(uid);
            let fired = match population {
                PopulationVariant::Blifat(p) => {
                    calculate_population(p, &messages, step, executor, part_size)
                }
                PopulationVariant::SynapticResourceBlifat(p) => {
                    calculate_population(p, &messages, step, executor, part_size)
                }
            };
            if fired.is_empty() {
                continue;
            }
            fired_total += fired.len();
            self.endpoint.send(SpikeMessage {
                header: MessageHeader {
                    sender_uid: uid,
                    send_time: step,
                },
                neuron_indexes: fired,
            });
        }
        fired_total
    }

    fn calculate_projections(&mut self, executor: &Executor<'_>, part_size: usize) -> usize {
        let step = self.step;
        let learning = self.learning;
        let mut debits: Vec<(usize, Vec<ResourceDebit>)> = Vec::new();
        let mut sent = 0;

        for state in self.projections.iter_mut() {
            let uid = state.projection.uid();
            let spiked: AHashSet<u32> = self
                .endpoint
                .unload_messages::<SpikeMessage>(uid)
                .into_iter()
                .flat_map(|message| message.neuron_indexes)
                .collect();
            let post_uid = state.projection.postsynaptic_uid();
            let post_index = self.population_index.get(&post_uid).copied();

            let outputs = match &mut state.projection {
                ProjectionVariant::Delta(projection) => {
                    propagate_delta(projection, &spiked, step, executor, part_size)
                }
                ProjectionVariant::SynapticResourceDelta(projection) => {
                    let postsynaptic = post_index.and_then(|index| match &self.populations[index] {
                        PopulationVariant::SynapticResourceBlifat(p) => Some(p.neurons()),
                        PopulationVariant::Blifat(_) => None,
                    });
                    propagate_resource_stdp(
                        projection,
                        postsynaptic,
                        &spiked,
                        step,
                        learning,
                        executor,
                        part_size,
                    )
                }
            };

            let mut projection_debits = Vec::new();
            for output in outputs {
                state.delay_queue.extend(output.impacts);
                projection_debits.extend(output.debits);
            }
            if let (Some(index), false) = (post_index, projection_debits.is_empty()) {
                debits.push((index, projection_debits));
            }

            let pre_uid = state.projection.presynaptic_uid();
            for due in state.delay_queue.take_due(step + 1) {
                self.endpoint.send(due.into_message(uid, pre_uid, post_uid));
                sent += 1;
            }
        }

        if learning {
            self.apply_plasticity(&debits);
        }
        sent
    }

    /// Settle resource debits, then renormalize every plastic population
    /// over its incoming plastic projections
    fn apply_plasticity(&mut self, debits: &[(usize, Vec<ResourceDebit>)]) {
        for (index, population_debits) in debits {
            if let Some(PopulationVariant::SynapticResourceBlifat(population)) =
                self.populations.get_mut(*index)
            {
                apply_resource_debits(population.neurons_mut(), population_debits);
            }
        }

        for population in self.populations.iter_mut() {
            let PopulationVariant::SynapticResourceBlifat(population) = population else {
                continue;
            };
            let uid = population.uid();
            let mut incoming: Vec<&mut [Synapse<ResourceStdpDeltaSynapse>]> = self
                .projections
                .iter_mut()
                .filter_map(|state| match &mut state.projection {
                    ProjectionVariant::SynapticResourceDelta(p) if p.postsynaptic_uid() == uid => {
                        Some(p.synapses_mut())
                    }
                    _ => None,
                })
                .collect();
            let neurons: &mut [SynapticResourceNeuron] = population.neurons_mut();
            let renormalized = renormalize_population(neurons, &mut incoming);
            if renormalized > 0 {
                trace!(
                    "[PLASTICITY] Renormalized {} neuron(s) of population {}",
                    renormalized,
                    uid
                );
            }
        }
    }
}

impl Default for BackendCore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendCore")
            .field("step", &self.step)
            .field("populations", &self.populations.len())
            .field("projections", &self.projections.len())
            .field("learning", &self.learning)
            .finish()
    }
}

fn validate_projection(projection: &ProjectionVariant, sizes: &AHashMap<Uid, usize>) -> Result<()> {
    if let Some(index) = projection.zero_delay_synapse() {
        return Err(SpikenetError::MalformedInput(format!(
            "projection {}: synapse {} has delay 0, delays start at 1",
            projection.uid(),
            index
        )));
    }

    let post_uid = projection.postsynaptic_uid();
    let post_size = *sizes
        .get(&post_uid)
        .ok_or(SpikenetError::PopulationNotFound(post_uid))?;
    let pre_size = match projection.presynaptic_uid() {
        Some(pre_uid) => Some(
            *sizes
                .get(&pre_uid)
                .ok_or(SpikenetError::PopulationNotFound(pre_uid))?,
        ),
        None => None,
    };

    for (source, target) in projection.endpoints() {
        if let Some(pre_size) = pre_size {
            if source as usize >= pre_size {
                return Err(SpikenetError::NeuronIndexOutOfRange {
                    projection: projection.uid(),
                    index: source,
                    size: pre_size,
                });
            }
        }
        if target as usize >= post_size {
            return Err(SpikenetError::NeuronIndexOutOfRange {
                projection: projection.uid(),
                index: target,
                size: post_size,
            });
        }
    }
    Ok(())
}
