// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run a [`SynfireChain`] on a backend and summarize what happened.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use spikenet_npu_burst_engine::Backend;
use spikenet_npu_messaging::{InputChannel, SpikeMessage};
use spikenet_npu_network::ProjectionVariant;
use spikenet_npu_neural::{Result, Step, Uid};
use tracing::{debug, info, warn};

use crate::synfire::SynfireChain;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationActivity {
    pub spikes: usize,
    pub first_spike_step: Option<Step>,
    pub last_spike_step: Option<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub backend: String,
    pub steps: u64,
    pub learning: bool,
    /// Keyed by population label
    pub activity: BTreeMap<String, PopulationActivity>,
    pub readout_weight_mean: Option<f32>,
    pub slow_steps: usize,
    pub elapsed_ms: f64,
}

pub struct RunOptions {
    pub steps: u64,
    /// Stimulate the whole first layer every `stimulus_period` steps
    pub stimulus_period: u64,
    pub slow_step_warn: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps: 100,
            stimulus_period: 10,
            slow_step_warn: Duration::from_millis(50),
        }
    }
}

/// Load `chain` into `backend`, drive it with periodic input and observe
/// every population's spikes.
pub fn run_synfire(backend: &mut dyn Backend, chain: SynfireChain, options: &RunOptions) -> Result<SimulationSummary> {
    let labels: BTreeMap<Uid, String> = chain.labels().into_iter().collect();
    let input_projection = chain.input_projection;
    let readout_projection = chain.readout_projection;
    let layer_size = chain.layer_size as u32;
    backend.load_network(chain.network)?;

    let period = options.stimulus_period.max(1);
    let mut channel = InputChannel::new(Uid::new(), backend.message_bus().create_endpoint(), move |step| {
        if step % period == 0 {
            (0..layer_size).collect()
        } else {
            Vec::new()
        }
    });
    backend.subscribe_input(input_projection, &[channel.uid()])?;

    let observer_uid = Uid::new();
    let mut observer = backend.message_bus().create_endpoint();
    observer.subscribe::<SpikeMessage>(observer_uid, labels.keys().copied());

    let mut activity: BTreeMap<String, PopulationActivity> = labels
        .values()
        .map(|label| {
            (
                label.clone(),
                PopulationActivity {
                    spikes: 0,
                    first_spike_step: None,
                    last_spike_step: None,
                },
            )
        })
        .collect();

    info!(
        "[SIMULATION] Running {} step(s) on {} backend",
        options.steps,
        backend.backend_name()
    );
    let started = Instant::now();
    let mut slow_steps = 0;

    for _ in 0..options.steps {
        let step = backend.get_step();
        channel.send(step);

        let step_started = Instant::now();
        backend.step()?;
        let step_elapsed = step_started.elapsed();
        if step_elapsed > options.slow_step_warn {
            slow_steps += 1;
            warn!(
                "[SIMULATION] Step #{} took {:.2}ms (threshold {}ms)",
                step,
                step_elapsed.as_secs_f64() * 1000.0,
                options.slow_step_warn.as_millis()
            );
        }

        observer.receive_all();
        for message in observer.unload_messages::<SpikeMessage>(observer_uid) {
            let Some(label) = labels.get(&message.header.sender_uid) else {
                continue;
            };
            if let Some(entry) = activity.get_mut(label) {
                entry.spikes += message.neuron_indexes.len();
                entry.first_spike_step.get_or_insert(message.header.send_time);
                entry.last_spike_step = Some(message.header.send_time);
            }
        }
    }

    let elapsed = started.elapsed();
    for (label, entry) in &activity {
        debug!("[SIMULATION] {}: {} spike(s)", label, entry.spikes);
    }

    let readout_weight_mean = match backend.get_projection(readout_projection)? {
        ProjectionVariant::SynapticResourceDelta(projection) if !projection.is_empty() => {
            let total: f32 = projection.synapses().iter().map(|s| s.params.delta.weight).sum();
            Some(total / projection.len() as f32)
        }
        _ => None,
    };

    Ok(SimulationSummary {
        backend: backend.backend_name().to_string(),
        steps: options.steps,
        learning: backend.is_learning(),
        activity,
        readout_weight_mean,
        slow_steps,
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    })
}
